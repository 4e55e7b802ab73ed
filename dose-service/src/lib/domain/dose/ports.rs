use async_trait::async_trait;

use crate::domain::dose::errors::DoseError;
use crate::domain::dose::models::CalculationRequest;
use crate::domain::dose::models::DoseCalculation;

/// Port for dose calculation.
#[async_trait]
pub trait DoseCalculatorPort: Send + Sync + 'static {
    /// Compute the recommended dose of every requested drug.
    ///
    /// Read-only against the catalog.
    ///
    /// # Errors
    /// * `InvalidInput` - Weight is not positive, no drug requested, or no valid tier selected
    /// * `DrugNotFound` - Unknown drug id under strict lookup
    /// * `Catalog` - Catalog could not be read
    async fn calculate(&self, request: CalculationRequest) -> Result<DoseCalculation, DoseError>;
}
