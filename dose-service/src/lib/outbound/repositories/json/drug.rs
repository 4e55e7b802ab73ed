use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::JsonDocument;
use super::DRUGS_FILE;
use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::Concentration;
use crate::domain::drug::models::Dosage;
use crate::domain::drug::models::DosesPerDay;
use crate::domain::drug::models::Drug;
use crate::domain::drug::models::DrugId;
use crate::domain::drug::models::DrugName;
use crate::domain::drug::models::RawConcentration;
use crate::domain::drug::ports::DrugRepository;

/// Drug record as laid out in `drugs.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDrug {
    /// Older files carry no id; it is derived from the name on load.
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dosages: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dosage_per_kg: Option<f64>,
    concentration: RawConcentration,
    #[serde(default)]
    indication: String,
    #[serde(default)]
    usage_time: String,
    doses_per_day: u32,
}

impl From<&Drug> for StoredDrug {
    fn from(drug: &Drug) -> Self {
        let (dosages, dosage_per_kg) = drug.dosage.to_parts();
        Self {
            id: drug.id.as_str().to_string(),
            name: drug.name.as_str().to_string(),
            dosages,
            dosage_per_kg,
            concentration: drug.concentration.into(),
            indication: drug.indication.clone(),
            usage_time: drug.usage_time.clone(),
            doses_per_day: drug.doses_per_day.value(),
        }
    }
}

impl StoredDrug {
    fn key(&self) -> String {
        if self.id.trim().is_empty() {
            self.name.trim().to_lowercase().replace(' ', "-")
        } else {
            self.id.clone()
        }
    }

    fn to_domain(&self) -> Result<Drug, DrugError> {
        let name = DrugName::new(self.name.clone())?;
        let id = if self.id.trim().is_empty() {
            DrugId::from_name(&name)
        } else {
            DrugId::new(self.id.clone())?
        };

        Ok(Drug {
            id,
            name,
            dosage: Dosage::from_parts(self.dosages.clone(), self.dosage_per_kg)?,
            concentration: Concentration::try_from(self.concentration.clone())?,
            indication: self.indication.clone(),
            usage_time: self.usage_time.clone(),
            doses_per_day: DosesPerDay::new(self.doses_per_day)?,
        })
    }

    /// Invalid stored records are a storage fault, not a caller mistake.
    fn load(&self) -> Result<Drug, DrugError> {
        self.to_domain()
            .map_err(|e| DrugError::DatabaseError(format!("Invalid drug record '{}': {}", self.key(), e)))
    }
}

/// Drug catalog kept in `<data_dir>/drugs.json`.
pub struct JsonFileDrugRepository {
    document: JsonDocument<StoredDrug>,
}

impl JsonFileDrugRepository {
    /// Open the catalog, failing when any stored record is invalid.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, DrugError> {
        let document = JsonDocument::open(data_dir.as_ref().join(DRUGS_FILE)).await?;

        let count = document
            .read(|records| {
                records
                    .iter()
                    .map(StoredDrug::load)
                    .collect::<Result<Vec<_>, _>>()
                    .map(|drugs| drugs.len())
            })
            .await?;

        tracing::info!(path = %document.path().display(), drugs = count, "Drug catalog opened");

        Ok(Self { document })
    }
}

#[async_trait]
impl DrugRepository for JsonFileDrugRepository {
    async fn create(&self, drug: Drug) -> Result<Drug, DrugError> {
        let stored = StoredDrug::from(&drug);

        self.document
            .write(|records| {
                if records.iter().any(|r| r.key() == stored.id) {
                    return Err(DrugError::AlreadyExists(stored.id.clone()));
                }
                if records.iter().any(|r| r.name == stored.name) {
                    return Err(DrugError::NameTaken(stored.name.clone()));
                }
                records.push(stored);
                Ok(())
            })
            .await?;

        Ok(drug)
    }

    async fn find_by_id(&self, id: &DrugId) -> Result<Option<Drug>, DrugError> {
        self.document
            .read(|records| {
                records
                    .iter()
                    .find(|r| r.key() == id.as_str())
                    .map(StoredDrug::load)
                    .transpose()
            })
            .await
    }

    async fn list_all(&self) -> Result<Vec<Drug>, DrugError> {
        self.document
            .read(|records| records.iter().map(StoredDrug::load).collect())
            .await
    }

    async fn update(&self, drug: Drug) -> Result<Drug, DrugError> {
        let stored = StoredDrug::from(&drug);

        self.document
            .write(|records| {
                if records
                    .iter()
                    .any(|r| r.name == stored.name && r.key() != stored.id)
                {
                    return Err(DrugError::NameTaken(stored.name.clone()));
                }
                let slot = records
                    .iter_mut()
                    .find(|r| r.key() == stored.id)
                    .ok_or_else(|| DrugError::NotFound(stored.id.clone()))?;
                *slot = stored;
                Ok::<_, DrugError>(())
            })
            .await?;

        Ok(drug)
    }

    async fn delete(&self, id: &DrugId) -> Result<(), DrugError> {
        self.document
            .write(|records| {
                let index = records
                    .iter()
                    .position(|r| r.key() == id.as_str())
                    .ok_or_else(|| DrugError::NotFound(id.to_string()))?;
                records.remove(index);
                Ok(())
            })
            .await
    }
}
