//! Error types for the credit-risk crate

use thiserror::Error;

/// Errors produced by the credit-risk pipeline
#[derive(Error, Debug)]
pub enum CreditError {
    /// Input table does not match the expected feature schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// A transform was requested before fit completed
    #[error("Preprocessor not fitted")]
    NotFitted,

    /// An operation received an empty input
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The model does not support the requested capability
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Data loading or manipulation failure
    #[error("Data error: {0}")]
    Data(String),

    /// Invalid argument or state
    #[error("Validation error: {0}")]
    Validation(String),

    /// Array dimensions do not line up
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<polars::error::PolarsError> for CreditError {
    fn from(err: polars::error::PolarsError) -> Self {
        CreditError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for CreditError {
    fn from(err: serde_json::Error) -> Self {
        CreditError::Serialization(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CreditError>;
