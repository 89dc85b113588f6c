//! Event endpoints: create, list, scoped update, scoped delete.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use cadence_core::delete::DeleteOutcome;
use cadence_core::listing::{EventSeries, aggregate};
use cadence_core::store::EventFilter;
use cadence_core::update::UpdateRequest;
use cadence_core::{CadenceError, Event, Recurrence, UpdateScope};

use crate::auth::RequestIdentity;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events", get(list_events))
        .route("/events/{id}", patch(update_event))
        .route("/events/{id}", delete(delete_event))
}

/// Request body for creating an event
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub recurrence: Recurrence,
}

/// POST /events - Create a new base event
async fn create_event(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<Event>, AppError> {
    if req.title.trim().is_empty() {
        return Err(CadenceError::Validation("title must not be empty".into()).into());
    }

    let mut event = Event::new(
        req.title,
        req.start_time,
        req.end_time,
        identity.user_id,
        req.recurrence,
    );
    event.description = req.description;
    event.participants = req.participants.into_iter().collect();

    let event = state.store.create(event).await?;
    Ok(Json(event))
}

/// GET /events - List series visible to the caller (creator or participant)
async fn list_events(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
) -> Result<Json<Vec<EventSeries>>, AppError> {
    let visible = state
        .store
        .find(&EventFilter::visible_to(identity.user_id))
        .await?;
    Ok(Json(aggregate(visible)))
}

/// Request body for updating an event
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(flatten)]
    pub changes: UpdateRequest,
    pub recurrence_update_option: Option<UpdateScope>,
}

/// PATCH /events/:id - Apply field/participant deltas at a scope
async fn update_event(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let scope = req.recurrence_update_option.ok_or_else(|| {
        CadenceError::Validation("recurrenceUpdateOption is required".into())
    })?;

    let event = state
        .updates
        .update(&identity, &event_id, scope, &req.changes)
        .await?;
    Ok(Json(event))
}

/// Request body for deleting an event
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub recurrence_delete_option: Option<UpdateScope>,
}

/// DELETE /events/:id - Delete at a scope (may leave a tombstone)
async fn delete_event(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(event_id): Path<String>,
    Json(req): Json<DeleteEventRequest>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let scope = req.recurrence_delete_option.ok_or_else(|| {
        CadenceError::Validation("recurrenceDeleteOption is required".into())
    })?;

    let outcome = state.deletes.delete(&identity, &event_id, scope).await?;
    Ok(Json(outcome))
}
