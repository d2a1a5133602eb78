//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror. The
//! mapping onto HTTP status codes lives in `server::response`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected AI response format: {0}")]
    ResponseFormat(String),

    #[error("No image data found in AI response")]
    NoImageReturned,

    #[error("No style suggestions returned by AI service")]
    NoStyles,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the external AI collaborator.
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            Error::AiService(_)
                | Error::Http(_)
                | Error::ResponseFormat(_)
                | Error::NoImageReturned
                | Error::NoStyles
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
