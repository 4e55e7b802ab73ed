use serde::Serialize;

use super::ApiError;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;

pub mod change_password;
pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod reset_password;
pub mod update_user;

/// Account as returned to admins. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub username: String,
    pub full_name: String,
    pub role: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            full_name: user.full_name.as_str().to_string(),
            role: user.role.as_str().to_string(),
        }
    }
}

fn parse_username(raw: String) -> Result<Username, ApiError> {
    Username::new(raw).map_err(|e| ApiError::BadRequest(format!("Invalid username: {}", e)))
}
