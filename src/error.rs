use std::fmt;

use http::header::RETRY_AFTER;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Payload carried by every API-level failure kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    pub status_code: Option<u16>,
    pub raw_body: Option<String>,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            raw_body: None,
        }
    }

    fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let raw_body = String::from_utf8_lossy(body).into_owned();
        Self {
            message: extract_message(status, &raw_body),
            status_code: Some(status.as_u16()),
            raw_body: (!raw_body.is_empty()).then_some(raw_body),
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (HTTP {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum FinAutError {
    #[error("authentication failed: {0}")]
    Authentication(ErrorDetails),
    #[error("permission denied: {0}")]
    PermissionDenied(ErrorDetails),
    #[error("not found: {0}")]
    NotFound(ErrorDetails),
    #[error("validation failed: {0}")]
    Validation(ErrorDetails),
    #[error("rate limited: {details}")]
    RateLimit {
        details: ErrorDetails,
        /// Seconds from the `Retry-After` response header, when present.
        retry_after: Option<u64>,
    },
    #[error("server error: {0}")]
    Server(ErrorDetails),
    #[error("unexpected API response: {0}")]
    Unexpected(ErrorDetails),
    /// Network-level failure (timeout, connection refused, DNS). Never tied
    /// to an HTTP status and never retried by the pipeline.
    #[error("transport error: {0}")]
    Transport(String),
}

impl FinAutError {
    /// Maps a non-2xx API response to its failure kind.
    pub(crate) fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let details = ErrorDetails::from_response(status, body);
        match status.as_u16() {
            401 => FinAutError::Authentication(details),
            403 => FinAutError::PermissionDenied(details),
            404 => FinAutError::NotFound(details),
            422 => FinAutError::Validation(details),
            429 => FinAutError::RateLimit {
                details,
                retry_after: retry_after_seconds(headers),
            },
            500..=599 => FinAutError::Server(details),
            _ => FinAutError::Unexpected(details),
        }
    }
}

/// Pulls a human-readable message out of an error body. DRF-style responses
/// put it under `detail`, some endpoints under `message`; anything else is
/// surfaced verbatim.
fn extract_message(status: StatusCode, raw_body: &str) -> String {
    if raw_body.is_empty() {
        return format!("HTTP {}", status.as_u16());
    }
    match serde_json::from_str::<serde_json::Value>(raw_body) {
        Ok(value) => {
            let known_key = value
                .get("detail")
                .or_else(|| value.get("message"))
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                });
            known_key.unwrap_or_else(|| value.to_string())
        }
        Err(_) => raw_body.to_string(),
    }
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
