use serde::Serialize;
use thiserror::Error;

use crate::directive::ConfigScope;

/// Errors that can occur when applying directives to a descriptor.
///
/// Every variant except `CoprocessorNotFound` aborts the whole batch;
/// `CoprocessorNotFound` is reported through [`super::ChangeSet::warnings`].
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationError {
    #[error("Column family not found: {family}")]
    FamilyNotFound { family: String },
    #[error("Table attribute not found: {attribute}")]
    AttributeNotFound { attribute: String },
    #[error("No coprocessor registered with class {classname}")]
    CoprocessorNotFound { classname: String },
    #[error("Configuration key '{key}' not set on {scope}")]
    ConfigKeyNotFound { scope: ConfigScope, key: String },
    #[error("Coprocessor sequence numbers exhausted on table {table}")]
    CoprocessorSequenceExhausted { table: String },
    #[error("Incompatible directives: {reason}")]
    IncompatibleDirectives { reason: String },
}

impl MutationError {
    /// Returns true if this error aborts the batch.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MutationError::CoprocessorNotFound { .. })
    }
}

/// Result type for descriptor mutation.
pub type Result<T> = std::result::Result<T, MutationError>;
