use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::UserData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    username: String,
    password: String,
    full_name: String,
    role: String,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        Ok(CreateUserCommand::new(
            Username::new(self.username)?,
            Password::new(self.password)?,
            FullName::new(self.full_name)?,
            self.role.parse()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::Role;

    fn request(role: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: "nurse".to_string(),
            password: password.to_string(),
            full_name: "  Night Nurse ".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("admin", "secret1").try_into_command().unwrap();

        assert_eq!(command.role, Role::Admin);
        assert_eq!(command.full_name.as_str(), "Night Nurse");
    }

    #[test]
    fn test_unknown_role() {
        assert!(matches!(
            request("root", "secret1").try_into_command(),
            Err(UserError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_short_password() {
        assert!(matches!(
            request("user", "abc").try_into_command(),
            Err(UserError::Password(_))
        ));
    }
}
