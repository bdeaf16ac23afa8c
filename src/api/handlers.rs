use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::response::MessageResponse;
use super::AppState;
use crate::error::{validation_error, AppResult, Error};
use crate::events::service::require_id;
use crate::events::{Event, EventPatch, NewEvent};

/// Record identification for update and delete
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

fn body_error(rejection: JsonRejection) -> Error {
    validation_error(&rejection.body_text())
}

fn query_error(rejection: QueryRejection) -> Error {
    validation_error(&rejection.body_text())
}

/// Create answers every failure, a rejected payload included, as a server
/// error carrying the message
fn create_error(err: Error) -> Error {
    match err {
        Error::Validation(message) => Error::Other(message),
        other => other,
    }
}

/// GET /events
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let Json(payload) = payload.map_err(body_error).map_err(create_error)?;
    let event = state.events.create(payload).await.map_err(create_error)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PATCH /events?id=
pub async fn update_event(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    patch: Result<Json<EventPatch>, JsonRejection>,
) -> AppResult<Json<Event>> {
    let Query(query) = query.map_err(query_error)?;
    // A missing id is reported before anything about the body
    let id = require_id(query.id.as_deref())?;
    let Json(patch) = patch.map_err(body_error)?;
    let event = state.events.update(Some(id), patch).await?;
    Ok(Json(event))
}

/// DELETE /events?id=
pub async fn delete_event(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Query(query) = query.map_err(query_error)?;
    state.events.delete(query.id.as_deref()).await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
    }))
}

/// GET /health
pub async fn health_handler() -> &'static str {
    "OK"
}
