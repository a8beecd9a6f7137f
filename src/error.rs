use thiserror::Error;

#[derive(Error, Debug)]
pub enum JacketAiError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("API key is not set. Export GEMINI_API_KEY or run `jacket-ai config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("API call failed: {0}")]
    ApiCall(String),

    #[error("Failed to parse API response: {0}")]
    ApiParse(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] jacket_ai_common::Error),

    #[error("CLI error: {0}")]
    CliExecution(String),
}

pub type Result<T> = std::result::Result<T, JacketAiError>;
