use chrono::NaiveDate;

use crate::date;
use crate::error::ValidationError;
use crate::event::{EventRecord, EventType, VaccinationDetail};

/// Raw form input for saving an event, exactly as the UI submits it.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub animal_id: String,
    pub event_type: String,
    pub event_date: String,
    pub description: Option<String>,
    /// Required when `event_type` is VACINA; ignored otherwise.
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    /// Expiry date of the vaccine, used to derive validity days.
    pub expiration_date: Option<String>,
}

/// Raw vaccination fields on their own, as submitted when attaching a
/// detail to an event that was saved without one.
#[derive(Debug, Clone, Default)]
pub struct VaccinationInput {
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<String>,
}

/// Validator for raw event input.
pub struct Validator;

impl Validator {
    /// Validate the owning animal reference.
    pub fn validate_animal_id(raw: &str) -> Result<String, ValidationError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(ValidationError::MissingRelation);
        }
        Ok(id.to_string())
    }

    /// Parse and bound the event date. Events are recorded after the fact,
    /// so a date later than `today` is rejected at creation time.
    pub fn validate_event_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let parsed = date::parse_date(raw)?;
        if parsed > today {
            return Err(ValidationError::InvalidDate(raw.trim().to_string()));
        }
        Ok(parsed)
    }

    /// Validate and normalize a full submission into an `EventRecord`,
    /// plus the vaccination detail draft when the type is VACINA.
    ///
    /// Pure: no store interaction happens here, and every rejection blocks
    /// the save before anything is written.
    pub fn validate(
        input: &EventInput,
        today: NaiveDate,
    ) -> Result<(EventRecord, Option<VaccinationDetail>), ValidationError> {
        let animal_id = Self::validate_animal_id(&input.animal_id)?;
        let event_type: EventType = input.event_type.trim().parse()?;
        let event_date = Self::validate_event_date(&input.event_date, today)?;

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let record = EventRecord::new(animal_id.clone(), event_type, event_date, description);

        if !event_type.is_vaccination() {
            return Ok((record, None));
        }

        let fields = VaccinationInput {
            vaccine_name: input.vaccine_name.clone(),
            batch_number: input.batch_number.clone(),
            expiration_date: input.expiration_date.clone(),
        };
        let detail = Self::validate_vaccination(&fields, &animal_id, event_date)?;

        Ok((record, Some(detail)))
    }

    /// Validate and normalize vaccination fields into a detail draft.
    /// The application date is the parent event's date, and validity days
    /// are derived from it. `event_id` is left unset until the detail is
    /// tied to a persisted event.
    pub fn validate_vaccination(
        input: &VaccinationInput,
        animal_id: &str,
        application_date: NaiveDate,
    ) -> Result<VaccinationDetail, ValidationError> {
        let vaccine_name = input
            .vaccine_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingVaccineName)?
            .to_string();

        let batch_number = input
            .batch_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let expiration = input
            .expiration_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(date::parse_date)
            .transpose()?;

        Ok(VaccinationDetail {
            id: None,
            event_id: None,
            animal_id: animal_id.to_string(),
            vaccine_name,
            batch_number,
            application_date,
            validity_days: date::validity_days(application_date, expiration),
        })
    }
}
