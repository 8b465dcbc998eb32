use std::fmt;

use thiserror::Error;

use crate::track::TrackKey;

/// Unified result type for the track grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced to callers of the grid core.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid layout configuration: {0}")]
    InvalidConfiguration(String),
    #[error("layout catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which list a malformed item was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
    /// The remembered ordering from the previous computation.
    Previous,
    /// The freshly computed ordering.
    Next,
}

impl fmt::Display for ListRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRole::Previous => f.write_str("previous"),
            ListRole::Next => f.write_str("next"),
        }
    }
}

/// Recoverable failure of the visually stable reorder step.
///
/// Never returned from [`crate::VisualStableUpdate::update`]; the wrapper logs it
/// and keeps the last good ordering instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StabilizationError {
    #[error("{list} item at position {position} has no participant identity")]
    MissingIdentity { list: ListRole, position: usize },
    #[error("{list} ordering contains key `{key}` more than once")]
    DuplicateKey { list: ListRole, key: TrackKey },
}
