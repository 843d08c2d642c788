use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{EventPatch, EventRecord, VaccinationDetail};

/// Persistence boundary for events and vaccination details.
///
/// The core never implements persistence itself; implementations live at
/// the edge (SQLite in the server, in-memory below for tests). Calls may
/// suspend while awaiting the backend, but the core never issues
/// overlapping writes for the same record.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event, assigning its id.
    async fn create(&self, record: EventRecord) -> Result<EventRecord, StoreError>;

    /// Fetch an event by id.
    async fn get(&self, id: i64) -> Result<EventRecord, StoreError>;

    /// Apply a partial update to an event.
    async fn update(&self, id: i64, patch: EventPatch) -> Result<EventRecord, StoreError>;

    /// Delete an event. Idempotent: deleting a missing id succeeds.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// All events for an animal, ordered by event date descending.
    async fn list_by_animal(&self, animal_id: &str) -> Result<Vec<EventRecord>, StoreError>;

    /// Persist a vaccination detail, assigning its id.
    async fn create_vaccination_detail(
        &self,
        detail: VaccinationDetail,
    ) -> Result<VaccinationDetail, StoreError>;

    /// All vaccination details for an animal, ordered by application date
    /// descending.
    async fn list_vaccinations(
        &self,
        animal_id: &str,
    ) -> Result<Vec<VaccinationDetail>, StoreError>;

    /// Whether any detail row references the given event id. Legacy rows
    /// without an event id never match.
    async fn has_vaccination_for_event(&self, event_id: i64) -> Result<bool, StoreError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::RwLock;

    use super::*;

    /// In-memory event store for testing. Counts every store call so tests
    /// can assert that validation failures never reach the boundary, and
    /// can be told to fail detail writes to exercise partial saves.
    #[derive(Default)]
    pub struct InMemoryEventStore {
        events: RwLock<Vec<EventRecord>>,
        details: RwLock<Vec<VaccinationDetail>>,
        next_id: AtomicUsize,
        calls: AtomicUsize,
        fail_details: AtomicBool,
    }

    impl InMemoryEventStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Total store calls made so far.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Toggle failure of `create_vaccination_detail`, to exercise
        /// partial saves and their retry path.
        pub fn set_fail_details(&self, fail: bool) {
            self.fail_details.store(fail, Ordering::SeqCst);
        }

        fn bump(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn assign_id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1
        }
    }

    #[async_trait]
    impl EventStore for InMemoryEventStore {
        async fn create(&self, mut record: EventRecord) -> Result<EventRecord, StoreError> {
            self.bump();
            record.id = Some(self.assign_id());
            self.events.write().unwrap().push(record.clone());
            Ok(record)
        }

        async fn get(&self, id: i64) -> Result<EventRecord, StoreError> {
            self.bump();
            self.events
                .read()
                .unwrap()
                .iter()
                .find(|e| e.id == Some(id))
                .cloned()
                .ok_or(StoreError::NotFound(id))
        }

        async fn update(&self, id: i64, patch: EventPatch) -> Result<EventRecord, StoreError> {
            self.bump();
            let mut events = self.events.write().unwrap();
            let event = events
                .iter_mut()
                .find(|e| e.id == Some(id))
                .ok_or(StoreError::NotFound(id))?;
            *event = patch.apply(event);
            Ok(event.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), StoreError> {
            self.bump();
            self.events.write().unwrap().retain(|e| e.id != Some(id));
            Ok(())
        }

        async fn list_by_animal(&self, animal_id: &str) -> Result<Vec<EventRecord>, StoreError> {
            self.bump();
            let mut events: Vec<EventRecord> = self
                .events
                .read()
                .unwrap()
                .iter()
                .filter(|e| e.animal_id == animal_id)
                .cloned()
                .collect();
            events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
            Ok(events)
        }

        async fn create_vaccination_detail(
            &self,
            mut detail: VaccinationDetail,
        ) -> Result<VaccinationDetail, StoreError> {
            self.bump();
            if self.fail_details.load(Ordering::SeqCst) {
                return Err(StoreError::Persistence("detail write refused".to_string()));
            }
            detail.id = Some(self.assign_id());
            self.details.write().unwrap().push(detail.clone());
            Ok(detail)
        }

        async fn list_vaccinations(
            &self,
            animal_id: &str,
        ) -> Result<Vec<VaccinationDetail>, StoreError> {
            self.bump();
            let mut details: Vec<VaccinationDetail> = self
                .details
                .read()
                .unwrap()
                .iter()
                .filter(|d| d.animal_id == animal_id)
                .cloned()
                .collect();
            details.sort_by(|a, b| b.application_date.cmp(&a.application_date));
            Ok(details)
        }

        async fn has_vaccination_for_event(&self, event_id: i64) -> Result<bool, StoreError> {
            self.bump();
            Ok(self
                .details
                .read()
                .unwrap()
                .iter()
                .any(|d| d.event_id == Some(event_id)))
        }
    }

}
