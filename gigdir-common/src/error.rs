//! Common error types for gigdir

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Common result type for gigdir operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the storage, query and HTTP layers
///
/// `Validation` is always returned before any write is attempted.
/// `Database` is the persistence failure: the in-flight transaction has
/// already been rolled back by the time the caller sees it.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more submitted fields failed validation (batched)
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationErrors),

    /// Identifier does not resolve to an existing entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (corrupt stored value and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl Error {
    /// True when the error is a storage-layer failure
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Error::Database(_))
    }
}
