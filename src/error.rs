//! Error taxonomy for chat completion calls.
//!
//! Every failed call maps to exactly one of four kinds. None of them is
//! retried here; `RateLimit` carries the server's `Retry-After` hint for
//! callers that bring their own retry policy.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials were missing locally or rejected by the endpoint.
    #[error("authentication failed: {message}")]
    Authentication { status: Option<u16>, message: String },

    /// Endpoint unreachable, timed out, failed server-side, or sent back
    /// something that is not a JSON object.
    #[error("network error: {message}")]
    Network {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Unknown model, malformed messages, or any other request the endpoint
    /// (or local validation) refused.
    #[error("invalid request: {message}")]
    InvalidRequest { status: Option<u16>, message: String },

    /// The endpoint signalled throttling.
    #[error("rate limited: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<Duration>,
    },
}

/// Plain discriminant of [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Network,
    InvalidRequest,
    RateLimit,
}

impl ClientError {
    pub fn authentication(message: impl Into<String>) -> Self {
        ClientError::Authentication {
            status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ClientError::InvalidRequest {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Authentication { .. } => ErrorKind::Authentication,
            ClientError::Network { .. } => ErrorKind::Network,
            ClientError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ClientError::RateLimit { .. } => ErrorKind::RateLimit,
        }
    }

    /// HTTP status received from the endpoint, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { status, .. }
            | ClientError::Network { status, .. }
            | ClientError::InvalidRequest { status, .. } => *status,
            ClientError::RateLimit { .. } => Some(429),
        }
    }

    /// Classify a non-success HTTP response.
    ///
    /// - 401, 403 -> Authentication
    /// - 429      -> RateLimit
    /// - other 4xx -> InvalidRequest
    /// - 5xx and anything else unexpected -> Network
    pub fn from_status(status: u16, body: &[u8], retry_after: Option<Duration>) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("endpoint returned HTTP {status}"));
        match status {
            401 | 403 => ClientError::Authentication {
                status: Some(status),
                message,
            },
            429 => ClientError::RateLimit {
                message,
                retry_after,
            },
            400..=499 => ClientError::InvalidRequest {
                status: Some(status),
                message,
            },
            _ => ClientError::Network {
                status: Some(status),
                message,
                source: None,
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return ClientError::InvalidRequest {
                status: None,
                message: err.to_string(),
            };
        }
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("endpoint unreachable: {err}")
        } else {
            err.to_string()
        };
        ClientError::Network {
            status: err.status().map(|s| s.as_u16()),
            message,
            source: Some(err),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts the OpenAI shape `{"error": {"message": ..}}`, a bare
/// `{"error": ".."}`, and the serving-platform shape
/// `{"error_code": .., "message": ..}`. Falls back to the trimmed body text.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    if let Ok(v) = serde_json::from_slice::<serde_json::Value>(body) {
        let from_json = v
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str())
            .or_else(|| v.get("message").and_then(|m| m.as_str()));
        if let Some(msg) = from_json {
            let code = v.get("error_code").and_then(|c| c.as_str());
            return Some(match code {
                Some(code) => format!("{code}: {msg}"),
                None => msg.to_string(),
            });
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
