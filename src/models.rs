use serde::{Deserialize, Serialize};

use rebanho_core::{
    EventInput, EventPatch, EventRecord, VaccinationDetail, VaccinationInput, ValidationError,
};

/// Request to save a new event, fields exactly as the form submits them.
/// Dates are accepted in `YYYY-MM-DD` or `DD/MM/YYYY`; the core normalizes.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub animal_id: String,
    pub event_type: String,
    pub event_date: String,
    pub description: Option<String>,
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<String>,
}

impl CreateEventRequest {
    pub fn into_input(self) -> EventInput {
        EventInput {
            animal_id: self.animal_id,
            event_type: self.event_type,
            event_date: self.event_date,
            description: self.description,
            vaccine_name: self.vaccine_name,
            batch_number: self.batch_number,
            expiration_date: self.expiration_date,
        }
    }
}

/// Request to attach the vaccination detail to an event saved without one,
/// the follow-up after a partial save.
#[derive(Debug, Deserialize)]
pub struct AttachVaccinationRequest {
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<String>,
}

impl AttachVaccinationRequest {
    pub fn into_input(self) -> VaccinationInput {
        VaccinationInput {
            vaccine_name: self.vaccine_name,
            batch_number: self.batch_number,
            expiration_date: self.expiration_date,
        }
    }
}

/// Partial update request. Absent fields are left unchanged; a blank
/// `description` clears the stored text.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub event_type: Option<String>,
    pub event_date: Option<String>,
    pub description: Option<String>,
}

impl UpdateEventRequest {
    pub fn into_patch(self) -> Result<EventPatch, ValidationError> {
        let event_type = self
            .event_type
            .as_deref()
            .map(|t| t.trim().parse())
            .transpose()?;
        let event_date = self
            .event_date
            .as_deref()
            .map(rebanho_core::date::parse_date)
            .transpose()?;
        Ok(EventPatch {
            event_type,
            event_date,
            description: self.description,
        })
    }
}

/// Response for saving an event.
#[derive(Debug, Serialize)]
pub struct SaveEventResponse {
    pub event: EventRecord,
    pub vaccination: Option<VaccinationDetail>,
}

/// Response for listing an animal's events.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub animal_id: String,
    pub events: Vec<EventRecord>,
}

/// Response for listing an animal's vaccination details.
#[derive(Debug, Serialize)]
pub struct VaccinationListResponse {
    pub animal_id: String,
    pub vaccinations: Vec<VaccinationDetail>,
}

/// JSON error body. `event` is present only on partial saves, carrying the
/// already-persisted event so the client can retry just the detail half.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventRecord>,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            event: None,
        }
    }

    pub fn partial_save(message: impl Into<String>, event: EventRecord) -> Self {
        Self {
            code: "partial_save",
            message: message.into(),
            event: Some(event),
        }
    }
}
