// Central Error Type for the Crate

use thiserror::Error;

/// Crate-level error type
///
/// Queue operations themselves never return this: a stopped queue or an
/// expired wait is reported as `false` / `None`. Errors only come from
/// configuration and from item handlers run by a worker.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Handler error: {0}")]
    Handler(String),
}

/// Result type alias using QueueError
pub type Result<T> = std::result::Result<T, QueueError>;

impl From<String> for QueueError {
    fn from(err: String) -> Self {
        QueueError::Handler(err)
    }
}

impl From<&str> for QueueError {
    fn from(err: &str) -> Self {
        QueueError::Handler(err.to_string())
    }
}
