//! Error types for Dogma

/// Application-specific error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DogmaError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("{param}: {value} (expected: {pattern})")]
    InvalidFileName {
        param: String,
        value: String,
        pattern: &'static str,
    },

    #[error("invalid access action: {0}")]
    InvalidAction(String),
}

pub type Result<T> = std::result::Result<T, DogmaError>;
