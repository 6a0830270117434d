use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid {field}: {details}")]
    Validation { field: String, details: String },

    #[error("Invalid amount {0}: must be a finite, non-negative number")]
    InvalidAmount(f64),

    #[error("Invalid total budget {0}: must be greater than zero")]
    InvalidBudget(f64),

    #[error("Unknown partner: {0}")]
    UnknownPartner(String),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: String, id: String },

    #[error("Date parsing error: {0}")]
    DateError(String),

    #[error("Advisor request failed: {0}")]
    AdvisorFailed(String),

    #[error("Advisor returned an empty response")]
    EmptyResponse,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),
}

#[cfg(feature = "gemini")]
impl From<reqwest::Error> for BudgetError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl BudgetError {
    pub(crate) fn validation(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;
