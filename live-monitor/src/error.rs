//! Application-wide error types.

use live_detect::extractor::error::ExtractorError;
use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load monitored channels: {0}")]
    BatchLoad(String),

    #[error("Channel store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Detector error: {0}")]
    Detector(#[from] ExtractorError),
}

impl Error {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Detector(ExtractorError::from(err))
    }
}
