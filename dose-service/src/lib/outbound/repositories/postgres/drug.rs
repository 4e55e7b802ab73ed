use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use super::is_unique_violation;
use super::violated_constraint;
use crate::domain::drug::errors::DosesPerDayError;
use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::Concentration;
use crate::domain::drug::models::Dosage;
use crate::domain::drug::models::DosesPerDay;
use crate::domain::drug::models::Drug;
use crate::domain::drug::models::DrugId;
use crate::domain::drug::models::DrugName;
use crate::domain::drug::ports::DrugRepository;

#[derive(Debug, FromRow)]
struct DrugRow {
    id: String,
    name: String,
    dosage_per_kg: Option<f64>,
    dosage_tiers: Option<Vec<f64>>,
    concentration: f64,
    indication: String,
    usage_time: String,
    doses_per_day: i32,
}

impl TryFrom<DrugRow> for Drug {
    type Error = DrugError;

    fn try_from(row: DrugRow) -> Result<Self, Self::Error> {
        let doses_per_day = u32::try_from(row.doses_per_day).map_err(|_| DosesPerDayError::Zero)?;

        Ok(Drug {
            id: DrugId::new(row.id)?,
            name: DrugName::new(row.name)?,
            dosage: Dosage::from_parts(row.dosage_tiers, row.dosage_per_kg)?,
            concentration: Concentration::new(row.concentration)?,
            indication: row.indication,
            usage_time: row.usage_time,
            doses_per_day: DosesPerDay::new(doses_per_day)?,
        })
    }
}

const NAME_CONSTRAINT: &str = "uq_drugs_name";

fn doses_per_day_column(drug: &Drug) -> Result<i32, DrugError> {
    let value = drug.doses_per_day.value();
    i32::try_from(value).map_err(|_| {
        DrugError::from(DosesPerDayError::TooMany {
            max: DosesPerDay::MAX,
            actual: value,
        })
    })
}

fn write_error(err: sqlx::Error, drug: &Drug) -> DrugError {
    if !is_unique_violation(&err) {
        return DrugError::DatabaseError(err.to_string());
    }
    if violated_constraint(&err) == Some(NAME_CONSTRAINT) {
        DrugError::NameTaken(drug.name.to_string())
    } else {
        DrugError::AlreadyExists(drug.id.to_string())
    }
}

pub struct PostgresDrugRepository {
    pool: PgPool,
}

impl PostgresDrugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_DRUG: &str = r#"
    SELECT id, name, dosage_per_kg, dosage_tiers, concentration,
           indication, usage_time, doses_per_day
    FROM drugs
"#;

#[async_trait]
impl DrugRepository for PostgresDrugRepository {
    async fn create(&self, drug: Drug) -> Result<Drug, DrugError> {
        let (tiers, per_kilogram) = drug.dosage.to_parts();

        sqlx::query(
            r#"
            INSERT INTO drugs (id, name, dosage_per_kg, dosage_tiers, concentration,
                               indication, usage_time, doses_per_day)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(drug.id.as_str())
        .bind(drug.name.as_str())
        .bind(per_kilogram)
        .bind(tiers)
        .bind(drug.concentration.value())
        .bind(&drug.indication)
        .bind(&drug.usage_time)
        .bind(doses_per_day_column(&drug)?)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &drug))?;

        Ok(drug)
    }

    async fn find_by_id(&self, id: &DrugId) -> Result<Option<Drug>, DrugError> {
        let row = sqlx::query_as::<_, DrugRow>(&format!("{SELECT_DRUG} WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DrugError::DatabaseError(e.to_string()))?;

        row.map(Drug::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Drug>, DrugError> {
        let rows = sqlx::query_as::<_, DrugRow>(&format!("{SELECT_DRUG} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DrugError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Drug::try_from).collect()
    }

    async fn update(&self, drug: Drug) -> Result<Drug, DrugError> {
        let (tiers, per_kilogram) = drug.dosage.to_parts();

        let result = sqlx::query(
            r#"
            UPDATE drugs
            SET name = $2, dosage_per_kg = $3, dosage_tiers = $4, concentration = $5,
                indication = $6, usage_time = $7, doses_per_day = $8
            WHERE id = $1
            "#,
        )
        .bind(drug.id.as_str())
        .bind(drug.name.as_str())
        .bind(per_kilogram)
        .bind(tiers)
        .bind(drug.concentration.value())
        .bind(&drug.indication)
        .bind(&drug.usage_time)
        .bind(doses_per_day_column(&drug)?)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &drug))?;

        if result.rows_affected() == 0 {
            return Err(DrugError::NotFound(drug.id.to_string()));
        }

        Ok(drug)
    }

    async fn delete(&self, id: &DrugId) -> Result<(), DrugError> {
        let result = sqlx::query("DELETE FROM drugs WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DrugError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DrugError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
