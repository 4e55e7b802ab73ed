use serde::Deserialize;
use serde::Serialize;

use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::Concentration;
use crate::domain::drug::models::Dosage;
use crate::domain::drug::models::DosesPerDay;
use crate::domain::drug::models::Drug;
use crate::domain::drug::models::DrugCommand;
use crate::domain::drug::models::DrugName;
use crate::domain::drug::models::RawConcentration;

pub mod create_drug;
pub mod delete_drug;
pub mod get_drug;
pub mod list_drugs;
pub mod update_drug;

/// Drug fields accepted by create and update. An `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRequestBody {
    name: String,
    #[serde(default)]
    dosages: Option<Vec<f64>>,
    #[serde(default)]
    dosage_per_kg: Option<f64>,
    concentration: RawConcentration,
    #[serde(default)]
    indication: String,
    #[serde(default)]
    usage_time: String,
    doses_per_day: u32,
}

impl DrugRequestBody {
    fn try_into_command(self) -> Result<DrugCommand, DrugError> {
        Ok(DrugCommand {
            name: DrugName::new(self.name)?,
            dosage: Dosage::from_parts(self.dosages, self.dosage_per_kg)?,
            concentration: Concentration::try_from(self.concentration)?,
            indication: self.indication,
            usage_time: self.usage_time,
            doses_per_day: DosesPerDay::new(self.doses_per_day)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugData {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosages: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_per_kg: Option<f64>,
    pub concentration: f64,
    pub indication: String,
    pub usage_time: String,
    pub doses_per_day: u32,
}

impl From<&Drug> for DrugData {
    fn from(drug: &Drug) -> Self {
        let (dosages, dosage_per_kg) = drug.dosage.to_parts();
        Self {
            id: drug.id.as_str().to_string(),
            name: drug.name.as_str().to_string(),
            dosages,
            dosage_per_kg,
            concentration: drug.concentration.value(),
            indication: drug.indication.clone(),
            usage_time: drug.usage_time.clone(),
            doses_per_day: drug.doses_per_day.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::drug::errors::ConcentrationError;
    use crate::domain::drug::errors::DosageError;

    fn body(value: serde_json::Value) -> DrugRequestBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_legacy_concentration_array_accepted() {
        let command = body(json!({
            "name": "Cefixime",
            "dosages": [8],
            "concentration": [100],
            "dosesPerDay": 1
        }))
        .try_into_command()
        .unwrap();

        assert_eq!(command.concentration.value(), 100.0);
        assert_eq!(command.indication, "");
    }

    #[test]
    fn test_multi_value_concentration_rejected() {
        let result = body(json!({
            "name": "Cefixime",
            "dosages": [8],
            "concentration": [100, 200],
            "dosesPerDay": 1
        }))
        .try_into_command();

        assert!(matches!(
            result,
            Err(DrugError::InvalidConcentration(ConcentrationError::NotScalar(2)))
        ));
    }

    #[test]
    fn test_both_dosage_modes_rejected() {
        let result = body(json!({
            "name": "Cefixime",
            "dosages": [8],
            "dosagePerKg": 8,
            "concentration": 100,
            "dosesPerDay": 1
        }))
        .try_into_command();

        assert!(matches!(
            result,
            Err(DrugError::InvalidDosage(DosageError::Ambiguous))
        ));
    }

    #[test]
    fn test_drug_data_serializes_one_dosage_mode() {
        let command = body(json!({
            "name": "Ibuprofen Drops",
            "dosagePerKg": 10,
            "concentration": 40,
            "usageTime": "Every 8 hours",
            "dosesPerDay": 3
        }))
        .try_into_command()
        .unwrap();

        let json = serde_json::to_value(DrugData::from(&Drug::from_command(command))).unwrap();

        assert_eq!(json["id"], "ibuprofen-drops");
        assert_eq!(json["dosagePerKg"], 10.0);
        assert!(json.get("dosages").is_none());
        assert_eq!(json["usageTime"], "Every 8 hours");
    }
}
