//! Error types for the PastUs API client.
//!
//! # Design
//! Every service call resolves to `Result<_, ApiError>`; nothing is thrown
//! past the boundary. `NotFound` and `Unauthorized` get dedicated variants
//! because screens branch on them (missing post, expired session). All other
//! non-2xx responses land in `Server` with the status and whatever `message`
//! the server put in its error body.

use thiserror::Error;

use crate::validation::ValidationError;

/// Shown when neither the server nor the transport supplied anything better.
pub const GENERIC_FAILURE_MESSAGE: &str = "서버와 통신 중 문제가 발생했습니다.";

/// Errors returned by `PastusClient` parse methods and by every data source.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// The server returned 401; the stored session is missing or expired.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// The server returned a non-2xx status other than 401/404.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Server { status: u16, message: Option<String> },

    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body did not match the endpoint's schema.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Client-side validation rejected the input before any request was built.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// HTTP status associated with the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing text: the server's own message when it sent one.
    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound { message: Some(m) }
            | ApiError::Unauthorized { message: Some(m) }
            | ApiError::Server {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Validation(err) => err.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_generic_text() {
        let err = ApiError::Server {
            status: 409,
            message: Some("이미 사용 중인 아이디입니다.".to_string()),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.message(), "이미 사용 중인 아이디입니다.");
    }

    #[test]
    fn transport_failure_has_no_status_and_generic_text() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn not_found_without_body_falls_back() {
        let err = ApiError::NotFound { message: None };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), GENERIC_FAILURE_MESSAGE);
    }
}
