pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod state;

pub use config::Config;
pub use db::{init_pool, run_migrations, SqliteEventStore};
pub use models::{ApiError, CreateEventRequest, UpdateEventRequest};
pub use routes::create_router;
pub use state::AppState;
