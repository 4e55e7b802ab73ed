use thiserror::Error;

/// Error for DrugId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DrugIdError {
    #[error("Drug id must not be empty")]
    Empty,
}

/// Error for DrugName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DrugNameError {
    #[error("Drug name must not be empty")]
    Empty,
}

/// Error for dosage specification failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DosageError {
    #[error("Dosage must be a positive number, got {0}")]
    NonPositive(f64),

    #[error("At least one dosage tier is required")]
    NoTiers,

    #[error("Either 'dosages' or 'dosagePerKg' is required")]
    Missing,

    #[error("Only one of 'dosages' and 'dosagePerKg' may be given")]
    Ambiguous,
}

/// Error for concentration failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConcentrationError {
    #[error("Concentration must be a positive number, got {0}")]
    NonPositive(f64),

    #[error("Concentration must be a single value, got {0} values")]
    NotScalar(usize),
}

/// Error for doses-per-day failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DosesPerDayError {
    #[error("Doses per day must be at least 1")]
    Zero,

    #[error("Doses per day must be at most {max}, got {actual}")]
    TooMany { max: u32, actual: u32 },
}

/// Top-level error for catalog operations
#[derive(Debug, Clone, Error)]
pub enum DrugError {
    #[error("Invalid drug id: {0}")]
    InvalidId(#[from] DrugIdError),

    #[error("Invalid drug name: {0}")]
    InvalidName(#[from] DrugNameError),

    #[error("Invalid dosage: {0}")]
    InvalidDosage(#[from] DosageError),

    #[error("Invalid concentration: {0}")]
    InvalidConcentration(#[from] ConcentrationError),

    #[error("Invalid doses per day: {0}")]
    InvalidDosesPerDay(#[from] DosesPerDayError),

    #[error("Drug not found: {0}")]
    NotFound(String),

    #[error("Drug already exists: {0}")]
    AlreadyExists(String),

    #[error("Drug name already in use: {0}")]
    NameTaken(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
