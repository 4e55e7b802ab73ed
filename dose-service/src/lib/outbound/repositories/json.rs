mod document;
pub mod drug;
pub mod user;

pub use document::JsonDocument;
pub use document::StorageError;
pub use drug::JsonFileDrugRepository;
pub use user::JsonFileUserRepository;

use crate::domain::drug::errors::DrugError;
use crate::domain::user::errors::UserError;

pub const DRUGS_FILE: &str = "drugs.json";
pub const USERS_FILE: &str = "users.json";

impl From<StorageError> for DrugError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Catalog storage failure");
        DrugError::DatabaseError(err.to_string())
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Credential storage failure");
        UserError::DatabaseError(err.to_string())
    }
}
