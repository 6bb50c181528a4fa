use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeMetricsError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Failed to read credential file {}: {source}", path.display())]
    ConfigFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error reported by the cloud API inside its response envelope.
    #[error("{message}")]
    Backend {
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("{0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EdgeMetricsError {
    pub fn backend(message: impl Into<String>) -> Self {
        EdgeMetricsError::Backend {
            code: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for EdgeMetricsError {
    fn from(err: reqwest::Error) -> Self {
        EdgeMetricsError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for EdgeMetricsError {
    fn from(err: serde_json::Error) -> Self {
        EdgeMetricsError::Serialization(err.to_string())
    }
}

impl IntoResponse for EdgeMetricsError {
    fn into_response(self) -> Response {
        // Every failure on the traffic path surfaces the same way; the caller
        // only ever sees a message.
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EdgeMetricsError>;
