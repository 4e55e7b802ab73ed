use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_username;
use crate::domain::session::models::Principal;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let username = parse_username(username)?;

    state.user_service.delete_user(&username).await?;

    tracing::info!(username = %username, admin = %principal.username, "User removed");

    Ok(StatusCode::NO_CONTENT)
}
