//! Error types for the graph driver

use thiserror::Error;

/// Errors that can occur when using the graph driver
#[derive(Error, Debug)]
pub enum DriverError {
    /// Malformed key/value argument list
    #[error("Argument error: {0}")]
    Argument(String),

    /// Request shape the server would never accept
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Schema name violates the naming rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Vertex or edge does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success response from the server
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response that breaks the resource contract
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid client configuration
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DriverResult<T> = Result<T, DriverError>;
