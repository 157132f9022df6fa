//! Error types for dictionary dataset access.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Dataset access error.
///
/// A missing name surfaces as `NotFound`, any other backend failure as
/// `Storage`, and corrupt/truncated dataset bytes as `Format`. An
/// unresolved query is *not* an error; it yields an empty
/// [`QueryResult`](crate::QueryResult).
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying storage read failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Named resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Dataset bytes are corrupt, truncated, or out of range
    #[error("format error: {0}")]
    Format(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }
}
