use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use rebanho_core::{SaveError, StoreError};

use crate::models::{
    ApiError, AttachVaccinationRequest, CreateEventRequest, SaveEventResponse, UpdateEventRequest,
};
use crate::state::AppState;

/// Map an operation failure to a status and JSON error body.
fn error_response(err: SaveError) -> Response {
    match err {
        SaveError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(e.code(), e.to_string())),
        )
            .into_response(),
        SaveError::Store(StoreError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("not_found", format!("event not found: {id}"))),
        )
            .into_response(),
        SaveError::Store(StoreError::Persistence(msg)) => {
            tracing::error!("store failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("persistence_error", "database error")),
            )
                .into_response()
        }
        SaveError::PartialSave { event, source } => {
            tracing::error!(event_id = event.id, "partial save: {}", source);
            (
                StatusCode::MULTI_STATUS,
                Json(ApiError::partial_save(
                    "event saved but vaccination detail failed; retry the detail",
                    event,
                )),
            )
                .into_response()
        }
        SaveError::VaccinationAttached(id) => (
            StatusCode::CONFLICT,
            Json(ApiError::new(
                "vaccination_attached",
                format!("event {id} already has a vaccination detail attached"),
            )),
        )
            .into_response(),
    }
}

/// POST /api/events - Validate and save an event (and its vaccination
/// detail when the type is VACINA).
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Response {
    let today = chrono::Local::now().date_naive();
    match state.recorder.save(&req.into_input(), today).await {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(SaveEventResponse {
                event: saved.event,
                vaccination: saved.vaccination,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/events/:id/vaccination - Attach the vaccination detail to an
/// event that was saved without one (the partial-save recovery path).
pub async fn attach_vaccination(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AttachVaccinationRequest>,
) -> Response {
    match state.recorder.attach_vaccination(id, &req.into_input()).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/events/:id
pub async fn get_event(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.recorder.get(id).await {
        Ok(event) => Json(event).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/events/:id - Partial update.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Response {
    let patch = match req.into_patch() {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(e.code(), e.to_string())),
            )
                .into_response();
        }
    };

    let today = chrono::Local::now().date_naive();
    match state.recorder.update(id, patch, today).await {
        Ok(event) => Json(event).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/events/:id - Idempotent delete.
pub async fn delete_event(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.recorder.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
