use axum::extract::State;

use super::DrugData;
use crate::domain::drug::ports::DrugServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_drugs(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<DrugData>>, ApiError> {
    state
        .drug_service
        .list_drugs()
        .await
        .map_err(ApiError::from)
        .map(|drugs| ApiSuccess::ok(drugs.iter().map(DrugData::from).collect()))
}
