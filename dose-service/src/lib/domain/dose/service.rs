use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dose::errors::DoseError;
use crate::domain::dose::models::CalculationRequest;
use crate::domain::dose::models::DoseCalculation;
use crate::domain::dose::models::DoseResult;
use crate::domain::dose::models::LookupPolicy;
use crate::domain::dose::models::DOSE_MULTIPLIER;
use crate::domain::dose::ports::DoseCalculatorPort;
use crate::domain::drug::models::Dosage;
use crate::domain::drug::models::Drug;
use crate::domain::drug::ports::DrugRepository;

/// Dose calculator over the drug catalog.
pub struct DoseCalculator<DR>
where
    DR: DrugRepository,
{
    repository: Arc<DR>,
    lookup_policy: LookupPolicy,
}

impl<DR> DoseCalculator<DR>
where
    DR: DrugRepository,
{
    pub fn new(repository: Arc<DR>, lookup_policy: LookupPolicy) -> Self {
        Self {
            repository,
            lookup_policy,
        }
    }
}

#[async_trait]
impl<DR> DoseCalculatorPort for DoseCalculator<DR>
where
    DR: DrugRepository,
{
    async fn calculate(&self, request: CalculationRequest) -> Result<DoseCalculation, DoseError> {
        validate_request(&request)?;

        let mut results = DoseCalculation::new();
        for drug_id in &request.drug_ids {
            let Some(drug) = self.repository.find_by_id(drug_id).await? else {
                match self.lookup_policy {
                    LookupPolicy::Strict => {
                        return Err(DoseError::DrugNotFound(drug_id.to_string()));
                    }
                    LookupPolicy::Lenient => {
                        tracing::warn!(drug_id = %drug_id, "Skipping unknown drug in calculation");
                        continue;
                    }
                }
            };

            // Results are keyed by name, so two ids sharing one name cannot both be reported.
            if let Some(existing) = results.get(drug.name.as_str()) {
                if existing.drug_id == drug.id {
                    continue;
                }
                return Err(DoseError::InvalidInput(format!(
                    "drugs {} and {} share the name '{}'",
                    existing.drug_id, drug.id, drug.name
                )));
            }

            let selected = request.dosages.get(drug_id).copied();
            let result = compute_dose(request.weight, &drug, selected)?;
            results.insert(drug.name.as_str().to_string(), result);
        }

        Ok(results)
    }
}

fn validate_request(request: &CalculationRequest) -> Result<(), DoseError> {
    if !(request.weight.is_finite() && request.weight > 0.0) {
        return Err(DoseError::InvalidInput(format!(
            "weight must be greater than zero, got {}",
            request.weight
        )));
    }
    if request.drug_ids.is_empty() {
        return Err(DoseError::InvalidInput(
            "at least one drug must be selected".to_string(),
        ));
    }
    Ok(())
}

/// Dose of one drug for a patient of `weight` kilograms.
///
/// Tiered drugs: `total = weight * tier * 5 / concentration`, split over the
/// daily doses. Per-kilogram drugs: `total = weight * coefficient / concentration`
/// with no split.
pub fn compute_dose(weight: f64, drug: &Drug, selected: Option<f64>) -> Result<DoseResult, DoseError> {
    let concentration = drug.concentration.value();
    let doses_per_day = drug.doses_per_day.value();

    let (total_dose, dose_per_dose) = match &drug.dosage {
        Dosage::PerKilogram(coefficient) => ((weight * coefficient) / concentration, None),
        Dosage::Tiers(tiers) => {
            let tier = select_tier(drug, tiers, selected)?;
            let total = (weight * tier * DOSE_MULTIPLIER) / concentration;
            (total, Some(total / f64::from(doses_per_day)))
        }
    };

    Ok(DoseResult {
        drug_id: drug.id.clone(),
        total_dose,
        dose_per_dose,
        usage_time: drug.usage_time.clone(),
        doses_per_day,
    })
}

fn select_tier(drug: &Drug, tiers: &[f64], selected: Option<f64>) -> Result<f64, DoseError> {
    match (selected, tiers) {
        (Some(value), _) if tiers.iter().any(|tier| same_tier(*tier, value)) => Ok(value),
        (Some(value), _) => Err(DoseError::InvalidInput(format!(
            "dosage {} is not available for {}",
            value, drug.id
        ))),
        (None, [only]) => Ok(*only),
        (None, _) => Err(DoseError::InvalidInput(format!(
            "a dosage must be selected for {}",
            drug.id
        ))),
    }
}

fn same_tier(tier: f64, value: f64) -> bool {
    (tier - value).abs() <= 1e-9 * tier.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mockall::mock;

    use super::*;
    use crate::domain::drug::errors::DrugError;
    use crate::domain::drug::models::Concentration;
    use crate::domain::drug::models::DosesPerDay;
    use crate::domain::drug::models::DrugCommand;
    use crate::domain::drug::models::DrugId;
    use crate::domain::drug::models::DrugName;

    mock! {
        pub TestDrugRepository {}

        #[async_trait]
        impl DrugRepository for TestDrugRepository {
            async fn create(&self, drug: Drug) -> Result<Drug, DrugError>;
            async fn find_by_id(&self, id: &DrugId) -> Result<Option<Drug>, DrugError>;
            async fn list_all(&self) -> Result<Vec<Drug>, DrugError>;
            async fn update(&self, drug: Drug) -> Result<Drug, DrugError>;
            async fn delete(&self, id: &DrugId) -> Result<(), DrugError>;
        }
    }

    fn drug(name: &str, dosage: Dosage, concentration: f64, doses_per_day: u32) -> Drug {
        Drug::from_command(DrugCommand {
            name: DrugName::new(name.to_string()).unwrap(),
            dosage,
            concentration: Concentration::new(concentration).unwrap(),
            indication: String::new(),
            usage_time: "Every 12 hours".to_string(),
            doses_per_day: DosesPerDay::new(doses_per_day).unwrap(),
        })
    }

    fn id(value: &str) -> DrugId {
        DrugId::new(value.to_string()).unwrap()
    }

    fn request(weight: f64, ids: &[&str], dosages: &[(&str, f64)]) -> CalculationRequest {
        CalculationRequest {
            weight,
            drug_ids: ids.iter().map(|value| id(value)).collect(),
            dosages: dosages
                .iter()
                .map(|(key, value)| (id(key), *value))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn catalog(drugs: Vec<Drug>) -> MockTestDrugRepository {
        let mut repository = MockTestDrugRepository::new();
        repository.expect_find_by_id().returning(move |wanted| {
            Ok(drugs.iter().find(|drug| &drug.id == wanted).cloned())
        });
        repository
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_tiered_dose_reference_example() {
        let amoxicillin = drug("Amoxicillin", Dosage::Tiers(vec![0.5, 1.0]), 250.0, 2);

        let result = compute_dose(20.0, &amoxicillin, Some(0.5)).unwrap();

        assert_close(result.total_dose, 0.2);
        assert_close(result.dose_per_dose.unwrap(), 0.1);
        assert_eq!(result.doses_per_day, 2);
        assert_eq!(result.usage_time, "Every 12 hours");
    }

    #[test]
    fn test_tiered_dose_formula() {
        let cefixime = drug("Cefixime", Dosage::Tiers(vec![8.0]), 100.0, 3);

        let result = compute_dose(12.5, &cefixime, Some(8.0)).unwrap();

        let expected_total = 12.5 * 8.0 * 5.0 / 100.0;
        assert_close(result.total_dose, expected_total);
        assert_close(result.dose_per_dose.unwrap(), expected_total / 3.0);
    }

    #[test]
    fn test_per_kilogram_dose_has_no_split() {
        let paracetamol = drug("Paracetamol", Dosage::PerKilogram(15.0), 120.0, 4);

        let result = compute_dose(10.0, &paracetamol, Some(99.0)).unwrap();

        assert_close(result.total_dose, 10.0 * 15.0 / 120.0);
        assert_eq!(result.dose_per_dose, None);
    }

    #[test]
    fn test_single_tier_used_when_none_selected() {
        let cefixime = drug("Cefixime", Dosage::Tiers(vec![8.0]), 100.0, 2);

        let result = compute_dose(10.0, &cefixime, None).unwrap();

        assert_close(result.total_dose, 4.0);
    }

    #[test]
    fn test_selection_required_with_several_tiers() {
        let amoxicillin = drug("Amoxicillin", Dosage::Tiers(vec![0.5, 1.0]), 250.0, 2);

        let result = compute_dose(20.0, &amoxicillin, None);

        assert!(matches!(result, Err(DoseError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let amoxicillin = drug("Amoxicillin", Dosage::Tiers(vec![0.5, 1.0]), 250.0, 2);

        let result = compute_dose(20.0, &amoxicillin, Some(0.75));

        assert!(matches!(result, Err(DoseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_non_positive_weight_rejected_before_lookup() {
        let mut repository = MockTestDrugRepository::new();
        repository.expect_find_by_id().times(0);
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Strict);

        for weight in [0.0, -3.0, f64::NAN] {
            let result = calculator
                .calculate(request(weight, &["amoxicillin"], &[]))
                .await;
            assert!(matches!(result, Err(DoseError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_empty_drug_list_rejected() {
        let mut repository = MockTestDrugRepository::new();
        repository.expect_find_by_id().times(0);
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Lenient);

        let result = calculator.calculate(request(20.0, &[], &[])).await;

        assert!(matches!(result, Err(DoseError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_results_keyed_by_drug_name() {
        let repository = catalog(vec![
            drug("Amoxicillin", Dosage::Tiers(vec![0.5, 1.0]), 250.0, 2),
            drug("Paracetamol", Dosage::PerKilogram(15.0), 120.0, 4),
        ]);
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Strict);

        let results = calculator
            .calculate(request(
                20.0,
                &["amoxicillin", "paracetamol"],
                &[("amoxicillin", 1.0)],
            ))
            .await
            .unwrap();

        assert_eq!(
            results.keys().collect::<Vec<_>>(),
            vec!["Amoxicillin", "Paracetamol"]
        );
        assert_close(results["Amoxicillin"].total_dose, 0.4);
        assert_close(results["Paracetamol"].total_dose, 2.5);
    }

    #[tokio::test]
    async fn test_shared_name_across_ids_rejected() {
        let syrup = drug("Syrup", Dosage::PerKilogram(10.0), 100.0, 3);
        let forte = Drug {
            id: id("syrup-forte"),
            ..syrup.clone()
        };
        let calculator =
            DoseCalculator::new(Arc::new(catalog(vec![syrup, forte])), LookupPolicy::Strict);

        let result = calculator
            .calculate(request(20.0, &["syrup", "syrup-forte"], &[]))
            .await;

        assert!(matches!(result, Err(DoseError::InvalidInput(msg)) if msg.contains("Syrup")));
    }

    #[tokio::test]
    async fn test_repeated_id_reported_once() {
        let calculator = DoseCalculator::new(
            Arc::new(catalog(vec![drug("Syrup", Dosage::PerKilogram(10.0), 100.0, 3)])),
            LookupPolicy::Strict,
        );

        let results = calculator
            .calculate(request(20.0, &["syrup", "syrup"], &[]))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_close(results["Syrup"].total_dose, 2.0);
    }

    #[tokio::test]
    async fn test_strict_lookup_fails_on_unknown_drug() {
        let repository = catalog(vec![drug(
            "Amoxicillin",
            Dosage::Tiers(vec![0.5]),
            250.0,
            2,
        )]);
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Strict);

        let result = calculator
            .calculate(request(20.0, &["amoxicillin", "unknown"], &[]))
            .await;

        assert!(matches!(result, Err(DoseError::DrugNotFound(id)) if id == "unknown"));
    }

    #[tokio::test]
    async fn test_lenient_lookup_skips_unknown_drug() {
        let repository = catalog(vec![drug(
            "Amoxicillin",
            Dosage::Tiers(vec![0.5]),
            250.0,
            2,
        )]);
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Lenient);

        let results = calculator
            .calculate(request(20.0, &["unknown", "amoxicillin"], &[]))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results.contains_key("Amoxicillin"));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let mut repository = MockTestDrugRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(DrugError::DatabaseError("disk on fire".to_string())));
        let calculator = DoseCalculator::new(Arc::new(repository), LookupPolicy::Lenient);

        let result = calculator
            .calculate(request(20.0, &["amoxicillin"], &[]))
            .await;

        assert!(matches!(result, Err(DoseError::Catalog(_))));
    }
}
