use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::SessionError;
use crate::models::*;
use crate::session::{Action, SessionStore};

// ============================================================
// Error Handling
// ============================================================

/// Map a rejected action to a status code. The snapshot is unchanged in
/// every case, so the message is safe to return as-is.
fn session_error(e: SessionError) -> (StatusCode, String) {
    let status = match e {
        SessionError::NotFound { .. } => StatusCode::NOT_FOUND,
        SessionError::NoDestinationSelected => StatusCode::CONFLICT,
        SessionError::PointsOverflow => StatusCode::UNPROCESSABLE_ENTITY,
    };
    tracing::warn!("Validation error: {}", e);
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

pub async fn list_destinations(
    State(store): State<SessionStore>,
    Query(query): Query<DestinationQuery>,
) -> Json<Vec<Destination>> {
    let text = query.q.unwrap_or_default();
    Json(store.catalog().filter_destinations(&text))
}

pub async fn get_destination(
    State(store): State<SessionStore>,
    Path(id): Path<u32>,
) -> Result<Json<Destination>, (StatusCode, String)> {
    store
        .catalog()
        .destination(id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Destination not found".to_string()))
}

pub async fn list_tasks(State(store): State<SessionStore>) -> Json<Vec<EcoTask>> {
    Json(store.catalog().tasks.clone())
}

// ============================================================
// Session
// ============================================================

pub async fn get_session(State(store): State<SessionStore>) -> Json<SessionView> {
    Json(store.view())
}

pub async fn set_filter(
    State(store): State<SessionStore>,
    Json(input): Json<SetFilterInput>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    store
        .dispatch(Action::SetFilterText(input.text))
        .map(Json)
        .map_err(session_error)
}

pub async fn select_destination(
    State(store): State<SessionStore>,
    Json(input): Json<SelectDestinationInput>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    store
        .dispatch(Action::SelectDestination(input.destination_id))
        .map(Json)
        .map_err(session_error)
}

pub async fn clear_selection(
    State(store): State<SessionStore>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    store
        .dispatch(Action::ClearSelection)
        .map(Json)
        .map_err(session_error)
}

pub async fn complete_task(
    State(store): State<SessionStore>,
    Path(id): Path<u32>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    store
        .dispatch(Action::CompleteTask(id))
        .map(Json)
        .map_err(session_error)
}

pub async fn reset_session(
    State(store): State<SessionStore>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    store
        .dispatch(Action::Reset)
        .map(Json)
        .map_err(session_error)
}
