use std::sync::Arc;

use sqlx::SqlitePool;

use rebanho_core::EventRecorder;

use crate::db::SqliteEventStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub recorder: EventRecorder<SqliteEventStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            recorder: EventRecorder::new(Arc::new(SqliteEventStore::new(pool))),
        }
    }
}
