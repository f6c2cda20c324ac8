//! Reporter error types.

use thiserror::Error;

/// Why a single node could not be classified. Callers defer (leave the
/// classification unset) rather than guess; nothing here is retried
/// automatically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no parent node exists to compare with")]
    MissingParent,

    #[error("insufficient engine lines on the current or previous node")]
    InsufficientData,
}

/// The short-lived usage permit was refused. Non-fatal (silently
/// suppressed) unless the deployment requires a session.
#[derive(Error, Debug, Clone)]
#[error("permission denied: {0}")]
pub struct PermissionError(pub String);

/// The external evaluator could not supply lines for a position.
#[derive(Error, Debug, Clone)]
#[error("engine line fetch failed: {0}")]
pub struct LineFetchError(pub String);

/// Errors surfaced to realtime observers.
#[derive(Error, Debug, Clone)]
pub enum RealtimeError {
    #[error("insufficient engine lines to classify the current move")]
    InsufficientLines,

    #[error("{0}")]
    Permission(#[from] PermissionError),

    #[error("{0}")]
    LineFetch(#[from] LineFetchError),
}
