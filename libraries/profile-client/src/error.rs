//! Error types for the backend client.

use crate::types::ApiError;
use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Errors that can occur when talking to the backend platform.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available, or the token was rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Sign-in rejected (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid backend URL
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Invalid client configuration (e.g. an API key that is not a valid header)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Upload target already exists in the bucket
    #[error("Object already exists: {0}")]
    ObjectExists(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for backend client operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Classify a transport failure from `send()`.
pub(crate) fn send_error(e: reqwest::Error) -> BackendError {
    if e.is_connect() || e.is_timeout() {
        BackendError::ServerUnreachable(e.to_string())
    } else {
        BackendError::Request(e)
    }
}

/// Convert a non-success response into an error.
///
/// Handles the statuses every endpoint shares; callers match endpoint-specific
/// statuses (406, 409, ...) before falling back to this.
pub(crate) async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED => BackendError::AuthRequired,
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            BackendError::RateLimited {
                retry_after_secs: retry_after,
            }
        }
        StatusCode::PAYLOAD_TOO_LARGE => BackendError::ServerError {
            status: 413,
            message: "File too large".to_string(),
        },
        _ => {
            let error_text = response.text().await.unwrap_or_default();
            BackendError::ServerError {
                status: status.as_u16(),
                message: ApiError::message_from_body(&error_text),
            }
        }
    }
}
