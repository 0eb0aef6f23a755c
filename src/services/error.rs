use thiserror::Error;

/// Failures raised by the storage layer.
///
/// The wrapped `sqlx` error is kept for logging and is never sent to clients.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl StorageError {
    pub fn is_connection(&self) -> bool {
        matches!(self, StorageError::Connection(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
