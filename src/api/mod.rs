pub mod handlers;
mod response;

pub use response::{ErrorResponse, MessageResponse};

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::events::EventService;
use handlers::{create_event, delete_event, health_handler, list_events, update_event};

/// Collection path for events
pub const EVENTS_PATH: &str = "/events";

/// Default cap on request bodies (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(events: EventService) -> Self {
        Self { events }
    }
}

/// Build the router for the event API
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route(
            EVENTS_PATH,
            get(list_events)
                .post(create_event)
                .patch(update_event)
                .delete(delete_event),
        )
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
