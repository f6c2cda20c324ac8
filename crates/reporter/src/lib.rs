//! Classification and accuracy engine.
//!
//! Consumes a state tree whose nodes already carry engine evaluation lines
//! and attaches a move-quality classification and accuracy to each position,
//! either for a whole game (`report`) or incrementally as the user appends
//! moves (`realtime`).

pub mod accuracy;
pub mod classification;
pub mod classify;
pub mod config;
pub mod error;
pub mod expected_points;
pub mod opening;
pub mod report;
pub mod realtime;
pub mod utils;

pub use accuracy::{game_accuracy, move_accuracy, Accuracies};
pub use classify::{classify, AnalysisOptions};
pub use config::ReporterConfig;
pub use error::{ClassifyError, LineFetchError, PermissionError, RealtimeError};
pub use opening::OpeningBook;
pub use report::{game_analysis, EstimatedRatings, GameAnalysis};
pub use realtime::{
    AnalysisStatus, AnonymousSession, LineProvider, MappedLines, RealtimeAnalyser,
    RealtimeUpdate, SessionGate,
};
