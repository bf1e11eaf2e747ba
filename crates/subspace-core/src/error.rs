//! Error types for subspace change detection
//!
//! Provides a unified error type for all subspace-drift crates.

use thiserror::Error;

/// Core error type for subspace change detection
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided at construction time
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Error reported by an external subspace model
    #[error("Model error: {0}")]
    Model(String),

    /// Time-delay embedding failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] hankel_embed::EmbeddingError),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for empty input
    pub fn empty_input(_operation: &str) -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error raised by a model implementation
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }
}
