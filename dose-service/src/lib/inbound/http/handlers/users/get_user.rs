use axum::extract::Path;
use axum::extract::State;

use super::parse_username;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let username = parse_username(username)?;

    state
        .user_service
        .get_user(&username)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::ok(user.into()))
}
