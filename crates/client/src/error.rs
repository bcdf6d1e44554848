//! Client error types.

use tablealter_core::authority::AuthorityError;
use tablealter_core::descriptor::MutationError;
use tablealter_core::directive::DirectiveError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid directive: {0}")]
    Directive(#[from] DirectiveError),

    #[error("Alteration rejected: {0}")]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
