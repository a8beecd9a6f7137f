//! Error types

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("The model returned no size rows")]
    NoEstimates,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
