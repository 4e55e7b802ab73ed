use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::drug::models::DrugId;

/// Unit-conversion multiplier of the tiered dosing convention.
pub const DOSE_MULTIPLIER: f64 = 5.0;

/// What to do with requested drug ids that are not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Fail the whole calculation
    #[default]
    Strict,
    /// Skip the unknown id
    Lenient,
}

/// Ephemeral calculation input.
#[derive(Debug, Clone)]
pub struct CalculationRequest {
    /// Patient weight in kilograms
    pub weight: f64,
    pub drug_ids: Vec<DrugId>,
    /// Selected dosage tier per drug id
    pub dosages: HashMap<DrugId, f64>,
}

/// Recommended dose for one drug.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseResult {
    pub drug_id: DrugId,
    pub total_dose: f64,
    /// Present for tiered drugs only
    pub dose_per_dose: Option<f64>,
    pub usage_time: String,
    pub doses_per_day: u32,
}

/// Results keyed by drug name.
pub type DoseCalculation = BTreeMap<String, DoseResult>;
