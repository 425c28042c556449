use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionKind;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Session expired ({kind}): {message}")]
    AuthExpired { kind: SessionKind, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ClientError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::AuthError(_) => "AUTH_ERROR",
            ClientError::AuthExpired { .. } => "AUTH_EXPIRED",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::NetworkError(_) => "NETWORK_ERROR",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::ValidationError(_) => "VALIDATION_ERROR",
            ClientError::Http { .. } => "HTTP_ERROR",
            ClientError::DecodeError(_) => "DECODE_ERROR",
            ClientError::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Status code the backend answered with, when the failure came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::AuthExpired { .. } | ClientError::Unauthorized(_) => {
                Some(StatusCode::UNAUTHORIZED)
            }
            ClientError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ClientError::Http { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::AuthError(_) | ClientError::AuthExpired { .. } | ClientError::Unauthorized(_)
        )
    }

    /// Maps a non-success response onto the taxonomy. `kind` names the session
    /// whose token was attached to the request, if any.
    pub fn from_status(status: StatusCode, message: String, kind: Option<SessionKind>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => match kind {
                Some(kind) => ClientError::AuthExpired { kind, message },
                None => ClientError::Unauthorized(message),
            },
            StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            s if s.is_server_error() => {
                ClientError::NetworkError(format!("server returned {}: {}", s.as_u16(), message))
            }
            s => ClientError::Http {
                status: s.as_u16(),
                message,
            },
        }
    }
}

/// Body shape used when reporting an error on stdout in JSON form.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&ClientError> for ErrorResponse {
    fn from(err: &ClientError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            code: err.error_code(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::DecodeError(err.to_string())
        } else if err.is_timeout() {
            ClientError::NetworkError(format!("request timed out: {}", err))
        } else {
            ClientError::NetworkError(err.to_string())
        }
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DecodeError(err.to_string())
    }
}
impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::StorageError(err.to_string())
    }
}
impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::ValidationError(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_with_token_is_expired_session() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            "token expired".into(),
            Some(SessionKind::Participant),
        );
        assert!(matches!(
            err,
            ClientError::AuthExpired {
                kind: SessionKind::Participant,
                ..
            }
        ));
        assert_eq!(err.error_code(), "AUTH_EXPIRED");
    }

    #[test]
    fn test_unauthorized_without_token() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, "nope".into(), None);
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_server_errors_are_network_errors() {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into(), None);
        assert!(matches!(err, ClientError::NetworkError(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_other_statuses_keep_code() {
        let err = ClientError::from_status(StatusCode::CONFLICT, "dup".into(), None);
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.to_string(), "HTTP 409: dup");
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "NOT_FOUND");
    }
}
