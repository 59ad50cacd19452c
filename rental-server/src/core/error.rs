//! Top-level server errors

use thiserror::Error;

/// Errors surfaced while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
