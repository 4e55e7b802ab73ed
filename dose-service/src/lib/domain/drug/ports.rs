use async_trait::async_trait;

use crate::domain::drug::errors::DrugError;
use crate::domain::drug::models::Drug;
use crate::domain::drug::models::DrugCommand;
use crate::domain::drug::models::DrugId;

/// Port for catalog management operations.
#[async_trait]
pub trait DrugServicePort: Send + Sync + 'static {
    /// Add a drug to the catalog under an id derived from its name.
    ///
    /// # Errors
    /// * `AlreadyExists` - A drug with the derived id exists
    /// * `DatabaseError` - Storage operation failed
    async fn create_drug(&self, command: DrugCommand) -> Result<Drug, DrugError>;

    /// Retrieve drug by id.
    ///
    /// # Errors
    /// * `NotFound` - Drug does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn get_drug(&self, id: &DrugId) -> Result<Drug, DrugError>;

    /// Retrieve the whole catalog.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn list_drugs(&self) -> Result<Vec<Drug>, DrugError>;

    /// Replace every field of an existing drug; the id is kept.
    ///
    /// # Errors
    /// * `NotFound` - Drug does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn update_drug(&self, id: &DrugId, command: DrugCommand) -> Result<Drug, DrugError>;

    /// Remove drug from the catalog.
    ///
    /// # Errors
    /// * `NotFound` - Drug does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn delete_drug(&self, id: &DrugId) -> Result<(), DrugError>;
}

/// Persistence operations for the drug catalog.
#[async_trait]
pub trait DrugRepository: Send + Sync + 'static {
    /// Persist a new drug.
    ///
    /// # Errors
    /// * `AlreadyExists` - Id is already taken
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, drug: Drug) -> Result<Drug, DrugError>;

    /// Retrieve drug by id (None if not found).
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn find_by_id(&self, id: &DrugId) -> Result<Option<Drug>, DrugError>;

    /// Retrieve all drugs.
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn list_all(&self) -> Result<Vec<Drug>, DrugError>;

    /// Replace an existing drug record.
    ///
    /// # Errors
    /// * `NotFound` - Drug does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn update(&self, drug: Drug) -> Result<Drug, DrugError>;

    /// Remove drug from storage.
    ///
    /// # Errors
    /// * `NotFound` - Drug does not exist
    /// * `DatabaseError` - Storage operation failed
    async fn delete(&self, id: &DrugId) -> Result<(), DrugError>;
}
