//! Reporter configuration from environment variables.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::classify::AnalysisOptions;
use crate::opening::OpeningBook;

#[derive(Clone, Debug)]
pub struct ReporterConfig {
    /// Opening book file (`.json`, or bincode for anything else); Theory
    /// classification is disabled when unset or unloadable.
    pub opening_book_path: Option<PathBuf>,

    pub include_brilliant: bool,
    pub include_critical: bool,
    pub include_theory: bool,

    /// Whether a refused usage permit is an error rather than a silent
    /// fallback to anonymous operation.
    pub session_required: bool,
}

impl ReporterConfig {
    pub fn load() -> Self {
        let opening_book_path = env::var("OPENING_BOOK_PATH").ok().map(PathBuf::from);

        Self {
            opening_book_path,
            include_brilliant: env_flag("INCLUDE_BRILLIANT", true),
            include_critical: env_flag("INCLUDE_CRITICAL", true),
            include_theory: env_flag("INCLUDE_THEORY", true),
            session_required: env_flag("SESSION_REQUIRED", false),
        }
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            include_brilliant: self.include_brilliant,
            include_critical: self.include_critical,
            include_theory: self.include_theory,
        }
    }

    /// Loads the configured opening book, falling back to an empty book
    /// (Theory disabled) when missing or unreadable.
    pub fn load_book(&self) -> OpeningBook {
        let Some(path) = &self.opening_book_path else {
            return OpeningBook::empty();
        };

        match OpeningBook::from_path(path) {
            Ok(book) => {
                info!(path = %path.display(), positions = book.len(), "opening book loaded");
                book
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load opening book");
                warn!("theory detection will be disabled");
                OpeningBook::empty()
            }
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
