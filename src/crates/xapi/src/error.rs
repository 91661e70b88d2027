//! Error types for the X API transport.

use chirp_core::ApiError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for X API operations.
pub type Result<T> = std::result::Result<T, XApiError>;

/// Errors raised while talking to the X API.
#[derive(Debug, Error)]
pub enum XApiError {
    /// HTTP request never produced a response.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("X API returned {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        /// Value of `x-rate-limit-reset` (epoch seconds), when present.
        reset: Option<String>,
    },

    /// 200 response that carries `errors` instead of `data`.
    #[error("X API error: {title}: {detail}")]
    Api { title: String, detail: String },

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request the transport cannot express.
    #[error("{0}")]
    Unsupported(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl XApiError {
    /// Build a status error from the response body. X returns either
    /// `{"title", "detail"}` or `{"errors": [{"message"}]}`.
    pub fn from_status(status: StatusCode, body: &str, reset: Option<String>) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| describe_body(&v))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("no response body")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            });

        XApiError::Status {
            status,
            message,
            reset,
        }
    }

    /// Inspect a 200 payload for an embedded error (e.g. unknown username).
    pub fn from_payload(payload: &Value) -> Option<Self> {
        if payload.get("data").is_some() {
            return None;
        }
        let first = payload.get("errors")?.as_array()?.first()?;
        let title = first
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Error")
            .to_string();
        let detail = first
            .get("detail")
            .or_else(|| first.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        Some(XApiError::Api { title, detail })
    }
}

fn describe_body(body: &Value) -> Option<String> {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    if let Some(title) = body.get("title").and_then(Value::as_str) {
        return Some(title.to_string());
    }
    body.get("errors")?
        .as_array()?
        .first()?
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Convert into the dispatcher's error taxonomy.
impl From<XApiError> for ApiError {
    fn from(err: XApiError) -> Self {
        match err {
            XApiError::HttpError(e) => ApiError::Transport(e.to_string()),
            XApiError::Status {
                status,
                message,
                reset,
            } => match status {
                StatusCode::TOO_MANY_REQUESTS => match reset {
                    Some(reset) => ApiError::RateLimited(format!("{} (resets at {})", message, reset)),
                    None => ApiError::RateLimited(message),
                },
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
                StatusCode::FORBIDDEN => ApiError::Forbidden(message),
                s if s.is_server_error() => ApiError::Transport(format!("{}: {}", s, message)),
                s => ApiError::Other(format!("{}: {}", s, message)),
            },
            XApiError::Api { title, detail } => {
                if title.contains("Not Found") {
                    ApiError::NotFound(detail)
                } else {
                    ApiError::Other(format!("{}: {}", title, detail))
                }
            }
            XApiError::InvalidResponse(msg) => ApiError::Other(msg),
            XApiError::Unsupported(msg) => ApiError::Unsupported(msg),
            XApiError::ConfigError(msg) => ApiError::Other(msg),
        }
    }
}
