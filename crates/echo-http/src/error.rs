//! Error types for the access layer.

use thiserror::Error;

/// Every failure an API call can produce, normalized into one shape.
///
/// Use [`HttpError::status`] and [`HttpError::detail`] for the uniform
/// `{status, detail}` view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    /// No response: connection refused, DNS failure, timeout.
    #[error("Transport failure: {message}")]
    Transport { message: String, timed_out: bool },

    /// HTTP 401. The session has been torn down by the time this is returned.
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("session expired"))]
    Unauthorized { detail: Option<String> },

    /// Any other 4xx.
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// 5xx.
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// 2xx whose body did not match the expected payload.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Request payload could not be serialized.
    #[error("Invalid request body: {0}")]
    Encode(String),

    /// Base URL or path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HttpError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            401 => HttpError::Unauthorized { detail },
            500..=599 => HttpError::Server { status, detail },
            _ => HttpError::Rejected { status, detail },
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        HttpError::Transport {
            timed_out: error.is_timeout(),
            message: error.to_string(),
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Unauthorized { .. } => Some(401),
            HttpError::Rejected { status, .. } | HttpError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured failure message supplied by the backend.
    pub fn detail(&self) -> Option<&str> {
        match self {
            HttpError::Unauthorized { detail }
            | HttpError::Rejected { detail, .. }
            | HttpError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns true for HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpError::Unauthorized { .. })
    }

    /// Returns true for a transport failure that was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Transport { timed_out: true, .. })
    }

    /// Message suitable for a store's `error` field: the backend detail when
    /// present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Result type alias using HttpError.
pub type HttpResult<T> = Result<T, HttpError>;

/// Pull the human-readable `detail` out of an error body.
///
/// Handles `{"detail": "text"}` and validation-style
/// `{"detail": [{"msg": "..."}, ...]}` bodies.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
