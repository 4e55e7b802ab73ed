use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::Drug;
use crate::domain::drug::models::DrugCommand;
use crate::domain::drug::models::DrugId;
use crate::domain::drug::ports::DrugRepository;
use crate::domain::drug::ports::DrugServicePort;

/// Domain service implementation for the drug catalog.
pub struct DrugService<DR>
where
    DR: DrugRepository,
{
    repository: Arc<DR>,
}

impl<DR> DrugService<DR>
where
    DR: DrugRepository,
{
    pub fn new(repository: Arc<DR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<DR> DrugServicePort for DrugService<DR>
where
    DR: DrugRepository,
{
    async fn create_drug(&self, command: DrugCommand) -> Result<Drug, DrugError> {
        let drug = Drug::from_command(command);

        let created = self.repository.create(drug).await?;
        tracing::info!(drug_id = %created.id, name = %created.name, "Drug created");

        Ok(created)
    }

    async fn get_drug(&self, id: &DrugId) -> Result<Drug, DrugError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DrugError::NotFound(id.to_string()))
    }

    async fn list_drugs(&self) -> Result<Vec<Drug>, DrugError> {
        self.repository.list_all().await
    }

    async fn update_drug(&self, id: &DrugId, command: DrugCommand) -> Result<Drug, DrugError> {
        let drug = Drug::with_id(id.clone(), command);

        let updated = self.repository.update(drug).await?;
        tracing::info!(drug_id = %updated.id, name = %updated.name, "Drug updated");

        Ok(updated)
    }

    async fn delete_drug(&self, id: &DrugId) -> Result<(), DrugError> {
        self.repository.delete(id).await?;
        tracing::info!(drug_id = %id, "Drug deleted");
        Ok(())
    }
}
