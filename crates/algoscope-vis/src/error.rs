//! Error types for the visualizer server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving or fetching steps.
#[derive(Debug, Error)]
pub enum Error {
    /// Engine rejected the request
    #[error(transparent)]
    Engine(#[from] algoscope_engine::Error),

    /// Request body was well-formed JSON but made no sense
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote step source failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<algoscope_core::ParseError> for Error {
    fn from(e: algoscope_core::ParseError) -> Self {
        Error::Engine(e.into())
    }
}

impl Error {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        use algoscope_engine::Error as Engine;
        match self {
            Error::Engine(Engine::Busy) => StatusCode::CONFLICT,
            Error::Engine(Engine::InvalidInput(_) | Engine::Structure(_) | Engine::WrongMode(_))
            | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Engine(Engine::SourceUnavailable(_)) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
