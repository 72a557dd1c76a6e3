use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for explorer operations.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Errors surfaced by the explorer library.
///
/// Row-level anomalies (unparseable dates, missing journals, ...) are never
/// reported through this type; they are counted in
/// [`crate::data::model::LoadReport`] instead.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The input file is missing, unreadable, or not tabular data at all.
    #[error("failed to load '{}': {message}", path.display())]
    DataSource { path: PathBuf, message: String },

    /// A year range whose lower bound exceeds its upper bound.
    #[error("invalid year range: {min} > {max}")]
    InvalidRange { min: i32, max: i32 },

    /// A filter parameter outside its accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings that cannot be used as given.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ExplorerError {
    pub(crate) fn data_source(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ExplorerError::DataSource {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error is a bad filter parameter the user can correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExplorerError::InvalidRange { .. } | ExplorerError::InvalidArgument(_)
        )
    }
}
