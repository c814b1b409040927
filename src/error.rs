//! Error types for the synthesis pipeline

use thiserror::Error;

/// Main error type for zpaytzo
#[derive(Error, Debug)]
pub enum Error {
    #[error("Text processing error: {0}")]
    Text(String),

    #[error("Audio processing error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource load error: {0}")]
    Resource(String),

    #[error("Synthesis cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for zpaytzo operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error::Audio(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Text(err.to_string())
    }
}
