use thiserror::Error;

/// Errors reported by a metadata authority or schema propagator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Table already exists: {0}")]
    TableExists(String),
    #[error("Version conflict on table {table}: expected {expected}, found {actual}")]
    VersionConflict {
        table: String,
        expected: u64,
        actual: u64,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Propagation failed: {0}")]
    Propagation(String),
}

/// Result type for authority operations.
pub type Result<T> = std::result::Result<T, AuthorityError>;
