use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::DrugData;
use super::DrugRequestBody;
use crate::domain::drug::ports::DrugServicePort;
use crate::domain::session::models::Principal;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn create_drug(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<DrugRequestBody>,
) -> Result<ApiSuccess<DrugData>, ApiError> {
    let drug = state
        .drug_service
        .create_drug(body.try_into_command()?)
        .await?;

    tracing::info!(drug_id = %drug.id, admin = %principal.username, "Drug added to catalog");

    Ok(ApiSuccess::new(StatusCode::CREATED, (&drug).into()))
}
