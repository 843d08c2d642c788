use thiserror::Error;

use crate::event::EventRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("animal id is required")]
    MissingRelation,

    #[error("invalid or missing date: {0:?}")]
    InvalidDate(String),

    #[error("invalid event type: {0:?}")]
    InvalidType(String),

    #[error("vaccine name is required for VACINA events")]
    MissingVaccineName,
}

impl ValidationError {
    /// Stable machine-readable code, used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRelation => "missing_relation",
            ValidationError::InvalidDate(_) => "invalid_date",
            ValidationError::InvalidType(_) => "invalid_type",
            ValidationError::MissingVaccineName => "missing_vaccine_name",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("event not found: {0}")]
    NotFound(i64),

    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Failure of a whole save/update/delete operation.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The event was persisted but the vaccination detail write failed.
    /// The persisted event (with its id) is carried so the caller can
    /// retry just the detail half instead of re-saving the event.
    #[error("event saved but vaccination detail failed: {source}")]
    PartialSave {
        event: EventRecord,
        source: StoreError,
    },

    /// The event already has a vaccination detail referencing it. Raised
    /// when a type change would orphan the detail, and when attaching a
    /// second detail to the same event.
    #[error("event {0} already has a vaccination detail attached")]
    VaccinationAttached(i64),
}
