use thiserror::Error;

/// Failure taxonomy of the import subsystem.
///
/// The format variants (`UnsupportedFormat` through `TooManyRows`) are fatal
/// to a whole call and surface before any row is processed. Per-row failures
/// never appear here; they accumulate as [`RowError`](super::RowError)s and
/// ride inside the report instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("unreadable file: {0}")]
    CorruptFile(String),

    #[error("file is {actual} bytes, limit is {limit}")]
    FileTooLarge { actual: usize, limit: usize },

    #[error("file has {actual} data rows, limit is {limit}")]
    TooManyRows { actual: usize, limit: usize },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
