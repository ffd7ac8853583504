//! HTTP-facing error type.
//!
//! Every variant renders as a JSON body of the form
//! `{"error": {"code": ..., "message": ..., "details": ...}}`.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Errors returned from middleware and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request carries no acceptable identity.
    ///
    /// `challenge` names the scheme advertised in `WWW-Authenticate`.
    #[error("unauthorized: {message}")]
    Unauthorized {
        message: String,
        details: Value,
        challenge: Option<String>,
    },

    #[error("forbidden: {message}")]
    Forbidden { message: String, details: Value },

    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
            challenge: None,
        }
    }

    /// Attaches a `WWW-Authenticate` challenge to an [`AppError::Unauthorized`].
    ///
    /// Other variants are returned unchanged.
    pub fn with_challenge(self, scheme: Option<String>) -> Self {
        match self {
            Self::Unauthorized {
                message, details, ..
            } => Self::Unauthorized {
                message,
                details,
                challenge: scheme,
            },
            other => other,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details, challenge) = match self {
            AppError::Unauthorized {
                message,
                details,
                challenge,
            } => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                message,
                details,
                challenge,
            ),
            AppError::Forbidden { message, details } => {
                (StatusCode::FORBIDDEN, "forbidden", message, details, None)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
                None,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if let Some(scheme) = challenge
            && let Ok(value) = HeaderValue::from_str(&scheme)
        {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unauthorized_status_and_challenge() {
        let response = AppError::unauthorized("Unauthorized", json!({}))
            .with_challenge(Some("Bearer".to_string()))
            .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[test]
    fn test_unauthorized_without_challenge_has_no_header() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_with_challenge_ignores_other_variants() {
        let err = AppError::forbidden("Forbidden", json!({})).with_challenge(Some("X".into()));
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::forbidden("f", json!({})).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::internal("i", json!({})).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
