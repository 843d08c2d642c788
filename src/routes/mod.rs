pub mod api;
pub mod events;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Event CRUD
        .route("/api/events", post(events::create_event))
        .route("/api/events/{id}", get(events::get_event))
        .route("/api/events/{id}", put(events::update_event))
        .route("/api/events/{id}", delete(events::delete_event))
        // Partial-save recovery: create just the vaccination detail
        .route(
            "/api/events/{id}/vaccination",
            post(events::attach_vaccination),
        )
        // Per-animal listings
        .route("/api/animals/{animal_id}/events", get(api::list_events))
        .route(
            "/api/animals/{animal_id}/vaccinations",
            get(api::list_vaccinations),
        )
        // Health check
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
