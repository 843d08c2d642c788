use std::sync::Arc;

use chrono::NaiveDate;

use crate::date;
use crate::error::{SaveError, ValidationError};
use crate::event::{EventPatch, EventRecord, VaccinationDetail};
use crate::store::EventStore;
use crate::validation::{EventInput, VaccinationInput, Validator};

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SavedEvent {
    pub event: EventRecord,
    pub vaccination: Option<VaccinationDetail>,
}

/// Sequential save pipeline over an injected store: validate, create the
/// event, conditionally create the vaccination detail.
///
/// The two writes are not transactional; the backend offers no way to
/// couple them. When the second write fails the persisted event is
/// reported through `SaveError::PartialSave` instead of being hidden as
/// either success or a plain failure.
#[derive(Clone)]
pub struct EventRecorder<S: EventStore> {
    store: Arc<S>,
}

impl<S: EventStore> EventRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate raw form input and persist it. `today` bounds the event
    /// date; callers pass the current date so the pipeline stays pure.
    pub async fn save(&self, input: &EventInput, today: NaiveDate) -> Result<SavedEvent, SaveError> {
        let (record, draft) = Validator::validate(input, today)?;

        let event = self.store.create(record).await?;

        let vaccination = match draft {
            None => None,
            Some(mut detail) => {
                detail.event_id = event.id;
                match self.store.create_vaccination_detail(detail).await {
                    Ok(saved) => Some(saved),
                    Err(source) => {
                        tracing::warn!(
                            event_id = event.id,
                            error = %source,
                            "vaccination detail write failed after event was saved"
                        );
                        return Err(SaveError::PartialSave { event, source });
                    }
                }
            }
        };

        Ok(SavedEvent { event, vaccination })
    }

    /// Attach a vaccination detail to an already-persisted event, the
    /// recovery path for the second half of a partial save. The event must
    /// exist, be a VACINA, and not carry a detail yet; the detail takes
    /// the event's date as its application date.
    pub async fn attach_vaccination(
        &self,
        event_id: i64,
        input: &VaccinationInput,
    ) -> Result<VaccinationDetail, SaveError> {
        let event = self.store.get(event_id).await?;
        if !event.event_type.is_vaccination() {
            return Err(ValidationError::InvalidType(event.event_type.as_str().to_string()).into());
        }
        if self.store.has_vaccination_for_event(event_id).await? {
            return Err(SaveError::VaccinationAttached(event_id));
        }

        let mut detail =
            Validator::validate_vaccination(input, &event.animal_id, event.event_date)?;
        detail.event_id = Some(event_id);
        Ok(self.store.create_vaccination_detail(detail).await?)
    }

    pub async fn get(&self, id: i64) -> Result<EventRecord, SaveError> {
        Ok(self.store.get(id).await?)
    }

    /// Partial update. The same date bound as creation applies: a patched
    /// event date later than `today` is rejected. A type change away from
    /// VACINA is refused while a vaccination detail references the event;
    /// silently orphaning the detail was explicitly not an option. Legacy
    /// details without an event id cannot be attributed and do not block
    /// the change.
    pub async fn update(
        &self,
        id: i64,
        patch: EventPatch,
        today: NaiveDate,
    ) -> Result<EventRecord, SaveError> {
        if let Some(new_date) = patch.event_date {
            if new_date > today {
                return Err(ValidationError::InvalidDate(date::canonical(new_date)).into());
            }
        }
        if let Some(new_type) = patch.event_type {
            if !new_type.is_vaccination() {
                let current = self.store.get(id).await?;
                if current.event_type.is_vaccination()
                    && self.store.has_vaccination_for_event(id).await?
                {
                    return Err(SaveError::VaccinationAttached(id));
                }
            }
        }
        Ok(self.store.update(id, patch).await?)
    }

    /// Idempotent delete. Details are never cascaded; they remain
    /// queryable by animal.
    pub async fn delete(&self, id: i64) -> Result<(), SaveError> {
        Ok(self.store.delete(id).await?)
    }

    pub async fn events_for(&self, animal_id: &str) -> Result<Vec<EventRecord>, SaveError> {
        Ok(self.store.list_by_animal(animal_id).await?)
    }

    pub async fn vaccinations_for(
        &self,
        animal_id: &str,
    ) -> Result<Vec<VaccinationDetail>, SaveError> {
        Ok(self.store.list_vaccinations(animal_id).await?)
    }
}
