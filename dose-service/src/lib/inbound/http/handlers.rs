use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::dose::errors::DoseError;
use crate::domain::drug::errors::DrugError;
use crate::domain::session::errors::AuthError;
use crate::domain::user::errors::PasswordError;
use crate::domain::user::errors::UserError;

pub mod calculate_dose;
pub mod drugs;
pub mod health;
pub mod login;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }

    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Plain `{"message": ...}` acknowledgement for operations with nothing to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidUsername(_)
            | UserError::InvalidFullName(_)
            | UserError::InvalidRole(_)
            | UserError::Password(PasswordError::TooShort { .. }) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<DrugError> for ApiError {
    fn from(err: DrugError) -> Self {
        match err {
            DrugError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DrugError::AlreadyExists(_) | DrugError::NameTaken(_) => {
                ApiError::Conflict(err.to_string())
            }
            DrugError::InvalidId(_)
            | DrugError::InvalidName(_)
            | DrugError::InvalidDosage(_)
            | DrugError::InvalidConcentration(_)
            | DrugError::InvalidDosesPerDay(_) => ApiError::BadRequest(err.to_string()),
            DrugError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<DoseError> for ApiError {
    fn from(err: DoseError) -> Self {
        match err {
            DoseError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            DoseError::DrugNotFound(_) => ApiError::NotFound(err.to_string()),
            DoseError::Catalog(err) => ApiError::from(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Login failures share one message so account existence is not revealed.
            AuthError::NotFound(_) | AuthError::InvalidCredential => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::MissingToken => {
                ApiError::Unauthorized("Missing authentication token".to_string())
            }
            AuthError::InvalidToken(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::Forbidden { .. } => ApiError::Forbidden("Insufficient permissions".to_string()),
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drug::errors::ConcentrationError;
    use crate::domain::user::models::Role;

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            ApiError::from(AuthError::NotFound("ghost".to_string())),
            ApiError::from(AuthError::InvalidCredential)
        );
        assert!(matches!(
            ApiError::from(AuthError::MissingToken),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Forbidden {
                required: Role::Admin,
                actual: Role::User
            }),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert!(matches!(
            ApiError::from(DrugError::from(ConcentrationError::NotScalar(2))),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::from(PasswordError::TooShort { min: 6, actual: 3 })),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(DoseError::InvalidInput("weight".to_string())),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn test_storage_errors_are_internal() {
        assert!(matches!(
            ApiError::from(DoseError::Catalog(DrugError::DatabaseError("io".to_string()))),
            ApiError::InternalServerError(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::from(PasswordError::HashingFailed("x".to_string()))),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_conflicts() {
        assert!(matches!(
            ApiError::from(DrugError::AlreadyExists("x".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DrugError::NameTaken("Syrup".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::UsernameAlreadyExists("x".to_string())),
            ApiError::Conflict(_)
        ));
    }
}
