use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::Role;
use crate::inbound::http::router::AppState;

/// Admit any valid session and expose its `Principal` to handlers.
pub async fn require_user(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, None).await
}

/// Admit admin sessions only.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, Some(Role::Admin)).await
}

async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    required_role: Option<Role>,
) -> Result<Response, ApiError> {
    let principal = state
        .auth_service
        .authorize(extract_token(&req), required_role)
        .map_err(|e| {
            tracing::warn!(
                method = %req.method(),
                uri = %req.uri(),
                error = %e,
                "Request rejected"
            );
            ApiError::from(e)
        })?;

    tracing::debug!(username = %principal.username, role = %principal.role, "Request authorized");

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Token from the `Authorization` header, with or without the `Bearer` scheme.
fn extract_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token.trim()),
        None if value.eq_ignore_ascii_case("bearer") => Some(""),
        _ => Some(value),
    }
}
