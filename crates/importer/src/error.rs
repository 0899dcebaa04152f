use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("TSV data cannot be empty")]
    EmptyInput,

    /// Names in the input that match nothing in the caller's catalog.
    #[error("No {entity} found for: {}", .names.join(", "))]
    NotFound {
        entity: &'static str,
        names: Vec<String>,
    },

    #[error("Unknown import type: {0}")]
    UnknownKind(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),
}
