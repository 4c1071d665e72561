use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("value cannot be used as an identifier: {0}")]
    InvalidIdentifier(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}
