//! Error types for search and replace operations

use thiserror::Error;

/// Every way a search or replace can fail.
///
/// All variants render as "Search failed: ..." so callers can surface the
/// message directly. None of them leave the document partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Search failed: invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Search failed: pattern evaluation exceeded {budget_ms} ms")]
    TimedOut { budget_ms: u64 },

    #[error("Search failed: {0}")]
    InvalidRequest(String),

    #[error("Search failed: match {index} out of range ({count} matches)")]
    MatchOutOfRange { index: usize, count: usize },

    #[error("Search failed: {0}")]
    Document(#[from] doc_model::DocModelError),

    #[error("Search failed: {0}")]
    Internal(String),
}

impl SearchError {
    /// Whether the user can fix this by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidPattern { .. }
                | SearchError::TimedOut { .. }
                | SearchError::InvalidRequest(_)
                | SearchError::MatchOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors loading or saving search settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
