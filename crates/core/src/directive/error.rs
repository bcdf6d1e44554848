use thiserror::Error;

/// Errors raised while classifying raw `alter` arguments.
///
/// `index` is the zero-based position of the offending argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("Malformed directive at argument {index}: {reason}")]
    MalformedDirective { index: usize, reason: String },
    #[error("Unknown METHOD '{method}' at argument {index}")]
    UnknownMethod { index: usize, method: String },
    #[error("Missing {key} at argument {index}")]
    MissingIdentifier { index: usize, key: &'static str },
}

/// Result type for directive parsing.
pub type Result<T> = std::result::Result<T, DirectiveError>;
