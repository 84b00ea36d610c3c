use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("storage error on '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid command: {message}")]
    InvalidCommand { message: String },
    #[error("terminal error: {message}")]
    Terminal { message: String },
    #[error("logging setup failed: {message}")]
    Logging { message: String },
}

impl TrackError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        TrackError::Validation {
            field,
            message: message.into(),
        }
    }
}
