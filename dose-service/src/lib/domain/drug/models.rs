use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::domain::drug::errors::ConcentrationError;
use crate::domain::drug::errors::DosageError;
use crate::domain::drug::errors::DosesPerDayError;
use crate::domain::drug::errors::DrugIdError;
use crate::domain::drug::errors::DrugNameError;

/// Drug catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Drug {
    pub id: DrugId,
    pub name: DrugName,
    pub dosage: Dosage,
    pub concentration: Concentration,
    pub indication: String,
    pub usage_time: String,
    pub doses_per_day: DosesPerDay,
}

impl Drug {
    /// Build a new catalog entry, deriving its id from the name.
    pub fn from_command(command: DrugCommand) -> Self {
        let id = DrugId::from_name(&command.name);
        Self::with_id(id, command)
    }

    /// Build a catalog entry under an existing id.
    pub fn with_id(id: DrugId, command: DrugCommand) -> Self {
        Self {
            id,
            name: command.name,
            dosage: command.dosage,
            concentration: command.concentration,
            indication: command.indication,
            usage_time: command.usage_time,
            doses_per_day: command.doses_per_day,
        }
    }
}

/// Catalog key: a slug derived from the drug name at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrugId(String);

impl DrugId {
    /// Parse an id received from a caller.
    ///
    /// # Errors
    /// * `Empty` - Id is blank
    pub fn new(id: String) -> Result<Self, DrugIdError> {
        if id.trim().is_empty() {
            return Err(DrugIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Lower-cased name with spaces replaced by `-`.
    pub fn from_name(name: &DrugName) -> Self {
        Self(name.as_str().to_lowercase().replace(' ', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Drug display name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugName(String);

impl DrugName {
    pub fn new(name: String) -> Result<Self, DrugNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DrugNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrugName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a drug is dosed per kilogram of body weight.
#[derive(Debug, Clone, PartialEq)]
pub enum Dosage {
    /// Single fixed coefficient
    PerKilogram(f64),
    /// Ordered set of coefficients the caller selects from
    Tiers(Vec<f64>),
}

impl Dosage {
    pub fn per_kilogram(coefficient: f64) -> Result<Self, DosageError> {
        Ok(Self::PerKilogram(positive(coefficient)?))
    }

    pub fn tiers(tiers: Vec<f64>) -> Result<Self, DosageError> {
        if tiers.is_empty() {
            return Err(DosageError::NoTiers);
        }
        let tiers = tiers
            .into_iter()
            .map(positive)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Tiers(tiers))
    }

    /// Build a dosage from the two wire fields; exactly one must be present.
    ///
    /// # Errors
    /// * `Missing` - Neither field given
    /// * `Ambiguous` - Both fields given
    /// * `NoTiers` / `NonPositive` - Values are invalid
    pub fn from_parts(
        tiers: Option<Vec<f64>>,
        per_kilogram: Option<f64>,
    ) -> Result<Self, DosageError> {
        match (tiers, per_kilogram) {
            (Some(tiers), None) => Self::tiers(tiers),
            (None, Some(coefficient)) => Self::per_kilogram(coefficient),
            (None, None) => Err(DosageError::Missing),
            (Some(_), Some(_)) => Err(DosageError::Ambiguous),
        }
    }

    /// Split back into the two wire fields.
    pub fn to_parts(&self) -> (Option<Vec<f64>>, Option<f64>) {
        match self {
            Dosage::Tiers(tiers) => (Some(tiers.clone()), None),
            Dosage::PerKilogram(coefficient) => (None, Some(*coefficient)),
        }
    }
}

fn positive(value: f64) -> Result<f64, DosageError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DosageError::NonPositive(value))
    }
}

/// Active-ingredient density; divisor of every dose computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Concentration(f64);

impl Concentration {
    pub fn new(value: f64) -> Result<Self, ConcentrationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConcentrationError::NonPositive(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Concentration as it appears on the wire and in stored documents.
///
/// Older catalog files store the value as a one-element array; both forms
/// are accepted, only the scalar form is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawConcentration {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl TryFrom<RawConcentration> for Concentration {
    type Error = ConcentrationError;

    fn try_from(raw: RawConcentration) -> Result<Self, Self::Error> {
        match raw {
            RawConcentration::Scalar(value) => Concentration::new(value),
            RawConcentration::Sequence(values) => match values.as_slice() {
                [value] => Concentration::new(*value),
                _ => Err(ConcentrationError::NotScalar(values.len())),
            },
        }
    }
}

impl From<Concentration> for RawConcentration {
    fn from(concentration: Concentration) -> Self {
        RawConcentration::Scalar(concentration.value())
    }
}

/// Number of administrations per day, at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosesPerDay(u32);

impl DosesPerDay {
    /// Largest count any store can hold (a signed 32-bit column).
    pub const MAX: u32 = i32::MAX as u32;

    pub fn new(value: u32) -> Result<Self, DosesPerDayError> {
        if value == 0 {
            return Err(DosesPerDayError::Zero);
        }
        if value > Self::MAX {
            return Err(DosesPerDayError::TooMany {
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Validated drug fields, used for both creation and full replacement.
#[derive(Debug, Clone)]
pub struct DrugCommand {
    pub name: DrugName,
    pub dosage: Dosage,
    pub concentration: Concentration,
    pub indication: String,
    pub usage_time: String,
    pub doses_per_day: DosesPerDay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_derived_from_name() {
        let name = DrugName::new("Amoxicillin Forte 250".to_string()).unwrap();
        assert_eq!(DrugId::from_name(&name).as_str(), "amoxicillin-forte-250");
    }

    #[test]
    fn test_blank_id_rejected() {
        assert_eq!(DrugId::new("  ".to_string()), Err(DrugIdError::Empty));
    }

    #[test]
    fn test_dosage_from_parts() {
        assert_eq!(
            Dosage::from_parts(Some(vec![0.5, 1.0]), None),
            Ok(Dosage::Tiers(vec![0.5, 1.0]))
        );
        assert_eq!(
            Dosage::from_parts(None, Some(10.0)),
            Ok(Dosage::PerKilogram(10.0))
        );
        assert_eq!(Dosage::from_parts(None, None), Err(DosageError::Missing));
        assert_eq!(
            Dosage::from_parts(Some(vec![1.0]), Some(1.0)),
            Err(DosageError::Ambiguous)
        );
        assert_eq!(
            Dosage::from_parts(Some(vec![]), None),
            Err(DosageError::NoTiers)
        );
        assert_eq!(
            Dosage::from_parts(Some(vec![0.5, -1.0]), None),
            Err(DosageError::NonPositive(-1.0))
        );
    }

    #[test]
    fn test_concentration_scalar_and_legacy_sequence() {
        let scalar: RawConcentration = serde_json::from_str("250").unwrap();
        let legacy: RawConcentration = serde_json::from_str("[250]").unwrap();

        assert_eq!(Concentration::try_from(scalar).unwrap().value(), 250.0);
        assert_eq!(Concentration::try_from(legacy).unwrap().value(), 250.0);
    }

    #[test]
    fn test_concentration_rejects_multiple_values() {
        let raw: RawConcentration = serde_json::from_str("[125, 250]").unwrap();
        assert_eq!(
            Concentration::try_from(raw),
            Err(ConcentrationError::NotScalar(2))
        );

        let empty: RawConcentration = serde_json::from_str("[]").unwrap();
        assert_eq!(
            Concentration::try_from(empty),
            Err(ConcentrationError::NotScalar(0))
        );
    }

    #[test]
    fn test_concentration_must_be_positive() {
        assert_eq!(
            Concentration::new(0.0),
            Err(ConcentrationError::NonPositive(0.0))
        );
    }

    #[test]
    fn test_concentration_written_as_scalar() {
        let raw = RawConcentration::from(Concentration::new(120.0).unwrap());
        assert_eq!(serde_json::to_string(&raw).unwrap(), "120.0");
    }

    #[test]
    fn test_doses_per_day_at_least_one() {
        assert_eq!(DosesPerDay::new(0), Err(DosesPerDayError::Zero));
        assert_eq!(DosesPerDay::new(3).unwrap().value(), 3);
        assert_eq!(
            DosesPerDay::new(DosesPerDay::MAX).unwrap().value(),
            i32::MAX as u32
        );
        assert_eq!(
            DosesPerDay::new(u32::MAX),
            Err(DosesPerDayError::TooMany {
                max: DosesPerDay::MAX,
                actual: u32::MAX
            })
        );
    }
}
