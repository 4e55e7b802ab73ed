use axum::extract::State;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::AuthServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let token = state
        .auth_service
        .authenticate(&body.username, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %body.username, error = %e, "Login failed");
            ApiError::from(e)
        })?;

    Ok(ApiSuccess::ok(LoginResponseData {
        token: token.into_inner(),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
