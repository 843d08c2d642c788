use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{ApiError, EventListResponse, VaccinationListResponse};
use crate::state::AppState;

/// GET /api/animals/:animal_id/events - Events for an animal, most recent
/// event date first. A snapshot, re-fetched on demand.
pub async fn list_events(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> Response {
    match state.recorder.events_for(&animal_id).await {
        Ok(events) => Json(EventListResponse { animal_id, events }).into_response(),
        Err(e) => {
            tracing::error!("failed to list events for {}: {}", animal_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("persistence_error", "database error")),
            )
                .into_response()
        }
    }
}

/// GET /api/animals/:animal_id/vaccinations - Vaccination details for an
/// animal, most recent application first.
pub async fn list_vaccinations(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> Response {
    match state.recorder.vaccinations_for(&animal_id).await {
        Ok(vaccinations) => Json(VaccinationListResponse {
            animal_id,
            vaccinations,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("failed to list vaccinations for {}: {}", animal_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("persistence_error", "database error")),
            )
                .into_response()
        }
    }
}
