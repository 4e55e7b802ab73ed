use axum::extract::State;
use axum::Extension;
use serde::Deserialize;

use crate::domain::session::models::Principal;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

/// The caller changes their own password; the account comes from the session, never the body.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let username = Username::new(principal.username)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid session: {}", e)))?;
    let new_password =
        Password::new(body.new_password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .change_password(&username, &body.current_password, new_password)
        .await?;

    Ok(ApiSuccess::ok(MessageData::new("Password changed successfully")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}
