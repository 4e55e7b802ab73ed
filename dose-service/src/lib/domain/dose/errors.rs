use thiserror::Error;

use crate::domain::drug::errors::DrugError;

/// Errors for dose calculation
#[derive(Debug, Clone, Error)]
pub enum DoseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Drug not found: {0}")]
    DrugNotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] DrugError),
}
