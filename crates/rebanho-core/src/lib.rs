//! Rebanho Core - Domain models, validation, and the store boundary.
//!
//! This crate contains the animal-event and vaccination recording model:
//! raw form input is validated and normalized into immutable records, a
//! VACINA event derives its vaccination side-record, and persistence goes
//! through the injected `EventStore`. It has no dependency on the server
//! crate or any concrete backend.

pub mod date;
pub mod error;
pub mod event;
pub mod recorder;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use error::{SaveError, StoreError, ValidationError};
pub use event::{EventPatch, EventRecord, EventType, VaccinationDetail};
pub use recorder::{EventRecorder, SavedEvent};
pub use store::EventStore;
pub use validation::{EventInput, VaccinationInput, Validator};

#[cfg(any(test, feature = "test-utils"))]
pub use store::memory::InMemoryEventStore;
