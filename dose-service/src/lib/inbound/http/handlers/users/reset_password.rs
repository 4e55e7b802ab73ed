use axum::extract::Path;
use axum::extract::State;
use serde::Deserialize;

use super::parse_username;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let username = parse_username(username)?;
    let new_password =
        Password::new(body.new_password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .reset_password(&username, new_password)
        .await?;

    Ok(ApiSuccess::ok(MessageData::new("Password reset successfully")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    new_password: String,
}
