//! API error responses.
//!
//! Every failure leaves the server as
//! `{"error": {"code": "...", "message": "..."}}`. Library errors are
//! classified by their own helpers; storage and other internal failures
//! are logged and replaced by a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nest_auth::AuthError;
use nest_commerce::CommerceError;
use serde::{Deserialize, Serialize};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// An error returned from a handler.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unauthorized: {}", msg);
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Forbidden: {}", msg);
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CommerceError> for ApiError {
    fn from(err: CommerceError) -> Self {
        if err.is_not_found() {
            Self::not_found(err.to_string())
        } else if err.is_validation() {
            Self::bad_request(err.to_string())
        } else if err.is_forbidden() {
            Self::forbidden(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_auth_failure() {
            Self::unauthorized(err.to_string())
        } else if err.is_permission_error() {
            Self::forbidden(err.to_string())
        } else if err.is_validation() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("blocking task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_commerce::ids::{BookId, UserId};

    #[test]
    fn test_commerce_mapping() {
        let missing: ApiError = CommerceError::BookNotFound(BookId::new(9)).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.message(), "Book not found: 9");

        let rule: ApiError = CommerceError::OrderNotCancellable("shipped".into()).into();
        assert_eq!(rule.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rule.code(), "VALIDATION_ERROR");

        let owner: ApiError = CommerceError::Forbidden("not your review".into()).into();
        assert_eq!(owner.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let err: ApiError = CommerceError::DatabaseError("disk I/O error".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_auth_mapping() {
        let bad: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

        let gone: ApiError = AuthError::UserNotFound(UserId::new(3)).into();
        assert_eq!(gone.status(), StatusCode::UNAUTHORIZED);

        let disabled: ApiError = AuthError::AccountDisabled.into();
        assert_eq!(disabled.status(), StatusCode::FORBIDDEN);

        let mismatch: ApiError = AuthError::PasswordMismatch.into();
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mismatch.message(), "passwords do not match");
    }

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ErrorEnvelope {
            error: ErrorBody {
                code: "NOT_FOUND".into(),
                message: "Order not found: 4".into(),
            },
        })
        .unwrap();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Order not found: 4");
    }
}
