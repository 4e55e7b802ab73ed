use thiserror::Error;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Role;

/// Authentication and authorization failures.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Role '{actual}' is not allowed, '{required}' required")]
    Forbidden { required: Role, actual: Role },

    #[error("Authentication failure: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(username) => AuthError::NotFound(username),
            UserError::InvalidCredentials => AuthError::InvalidCredential,
            other => AuthError::Internal(other.to_string()),
        }
    }
}
