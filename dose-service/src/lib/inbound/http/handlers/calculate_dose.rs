use std::collections::BTreeMap;
use std::collections::HashMap;

use axum::extract::State;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::dose::models::CalculationRequest;
use crate::domain::dose::models::DoseResult;
use crate::domain::dose::ports::DoseCalculatorPort;
use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::DrugId;
use crate::domain::session::models::Principal;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn calculate_dose(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CalculateDoseRequestBody>,
) -> Result<ApiSuccess<BTreeMap<String, DoseResultData>>, ApiError> {
    let request = body.try_into_request()?;
    let drug_count = request.drug_ids.len();

    let results = state.dose_calculator.calculate(request).await?;

    tracing::debug!(
        username = %principal.username,
        requested = drug_count,
        computed = results.len(),
        "Dose calculated"
    );

    Ok(ApiSuccess::ok(
        results
            .iter()
            .map(|(name, result)| (name.clone(), result.into()))
            .collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateDoseRequestBody {
    weight: f64,
    drug_ids: Vec<String>,
    #[serde(default)]
    dosages: HashMap<String, f64>,
}

impl CalculateDoseRequestBody {
    fn try_into_request(self) -> Result<CalculationRequest, DrugError> {
        let drug_ids = self
            .drug_ids
            .into_iter()
            .map(DrugId::new)
            .collect::<Result<Vec<_>, _>>()?;

        let dosages = self
            .dosages
            .into_iter()
            .map(|(id, dosage)| DrugId::new(id).map(|id| (id, dosage)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(CalculationRequest {
            weight: self.weight,
            drug_ids,
            dosages,
        })
    }
}

/// Doses rendered with one decimal place, e.g. `"0.2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseResultData {
    pub drug_id: String,
    pub total_dose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_per_dose: Option<String>,
    pub usage_time: String,
    pub doses_per_day: u32,
}

impl From<&DoseResult> for DoseResultData {
    fn from(result: &DoseResult) -> Self {
        Self {
            drug_id: result.drug_id.as_str().to_string(),
            total_dose: format!("{:.1}", result.total_dose),
            dose_per_dose: result.dose_per_dose.map(|dose| format!("{:.1}", dose)),
            usage_time: result.usage_time.clone(),
            doses_per_day: result.doses_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_formatting() {
        let result = DoseResult {
            drug_id: DrugId::new("amoxicillin".to_string()).unwrap(),
            total_dose: 0.2,
            dose_per_dose: Some(0.1),
            usage_time: "After meals".to_string(),
            doses_per_day: 2,
        };

        let data = DoseResultData::from(&result);

        assert_eq!(data.total_dose, "0.2");
        assert_eq!(data.dose_per_dose.as_deref(), Some("0.1"));
    }

    #[test]
    fn test_per_kilogram_result_omits_per_dose() {
        let result = DoseResult {
            drug_id: DrugId::new("ibuprofen".to_string()).unwrap(),
            total_dose: 2.0,
            dose_per_dose: None,
            usage_time: String::new(),
            doses_per_day: 3,
        };

        let json = serde_json::to_value(DoseResultData::from(&result)).unwrap();

        assert_eq!(json["totalDose"], "2.0");
        assert!(json.get("dosePerDose").is_none());
        assert_eq!(json["dosesPerDay"], 3);
    }

    #[test]
    fn test_blank_drug_id_rejected() {
        let body = CalculateDoseRequestBody {
            weight: 20.0,
            drug_ids: vec![" ".to_string()],
            dosages: HashMap::new(),
        };

        assert!(matches!(body.try_into_request(), Err(DrugError::InvalidId(_))));
    }
}
