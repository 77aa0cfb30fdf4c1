//! Error types for store operations

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid store configuration, such as a missing or malformed index combination
    #[error("Configuration error: {0}")]
    Config(String),

    /// A term violates an encoding constraint
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A code was not minted by the dictionary it was decoded with
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The plain term table ran into the quoted code range
    #[error("Code space exhausted: plain term index {0} collides with the quoted triple tag bit")]
    CodeSpaceExhausted(u32),

    /// A foreign term has no counterpart in the store's term model
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
