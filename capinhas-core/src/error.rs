//! Error types for the core crate

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
#[derive(Error, Debug)]
pub enum Error {
    /// Amount cannot be represented in centavos
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Display-formatted amount could not be parsed back
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
