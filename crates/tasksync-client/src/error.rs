//! Error types for the client I/O layer.

use thiserror::Error;

/// Error type for REST and push channel operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("You are unauthorized")]
    Unauthorized,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Push channel error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
