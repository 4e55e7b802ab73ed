use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::drug::models::DrugId;
use crate::domain::drug::ports::DrugServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub async fn delete_drug(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = DrugId::new(id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.drug_service.delete_drug(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
