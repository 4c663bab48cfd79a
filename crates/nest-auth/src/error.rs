//! Authentication errors.

use nest_commerce::ids::UserId;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown login or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token is malformed, has a bad signature or is of the wrong type.
    #[error("token invalid")]
    InvalidToken,

    /// Token has expired.
    #[error("token expired")]
    TokenExpired,

    /// A token names a user that no longer exists.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Username or email is already registered.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// The account has been switched off.
    #[error("user account is disabled")]
    AccountDisabled,

    /// The caller's role is too low.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The current password given for a change was wrong.
    #[error("current password is incorrect")]
    IncorrectPassword,

    /// A field failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::UserNotFound(_)
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            AuthError::AccountDisabled | AuthError::InsufficientPermissions
        )
    }

    /// Check if this error was caused by invalid input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AuthError::UserAlreadyExists(_)
                | AuthError::WeakPassword(_)
                | AuthError::PasswordMismatch
                | AuthError::IncorrectPassword
                | AuthError::Validation(_)
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[cfg(feature = "storage")]
impl From<nest_db::DbError> for AuthError {
    fn from(e: nest_db::DbError) -> Self {
        AuthError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(AuthError::InvalidCredentials.is_auth_failure());
        assert!(AuthError::TokenExpired.is_auth_failure());
        assert!(AuthError::AccountDisabled.is_permission_error());
        assert!(AuthError::PasswordMismatch.is_validation());
        assert!(!AuthError::Database("locked".into()).is_validation());
    }

    #[test]
    fn test_mismatch_message() {
        assert_eq!(AuthError::PasswordMismatch.to_string(), "passwords do not match");
    }
}
