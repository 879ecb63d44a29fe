//! Session error types.

use echo_http::HttpError;
use echo_storage::StorageError;
use thiserror::Error;

/// Session error type.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The API call failed; see [`HttpError`] for status and detail.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Durable storage could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid phase transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),
}

impl SessionError {
    /// HTTP status of the failed call, if it got a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Backend-supplied failure detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            SessionError::Http(e) => e.detail(),
            _ => None,
        }
    }

    /// Returns true if the call ended in HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Http(e) if e.is_unauthorized())
    }

    /// The backend detail when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_passes_through() {
        let err = SessionError::from(HttpError::from_status(
            400,
            r#"{"detail": "Incorrect email or password"}"#,
        ));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("Incorrect email or password"));
        assert_eq!(err.to_string(), "Request rejected (400): Incorrect email or password");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_storage_error_has_no_status() {
        let err = SessionError::from(StorageError::Encoding("bad".to_string()));
        assert_eq!(err.status(), None);
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_is_unauthorized() {
        let err = SessionError::from(HttpError::from_status(401, ""));
        assert!(err.is_unauthorized());
    }
}
