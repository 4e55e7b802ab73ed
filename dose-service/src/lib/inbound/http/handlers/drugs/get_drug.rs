use axum::extract::Path;
use axum::extract::State;

use super::DrugData;
use crate::domain::drug::models::DrugId;
use crate::domain::drug::ports::DrugServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn get_drug(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DrugData>, ApiError> {
    let id = DrugId::new(id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .drug_service
        .get_drug(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref drug| ApiSuccess::ok(drug.into()))
}
