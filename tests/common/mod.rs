#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kalenteri::api::{self, AppState, DEFAULT_BODY_LIMIT};
use kalenteri::error::{persistence_error, AppResult};
use kalenteri::events::{EventRecord, EventService, EventStore, InMemoryStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh in-memory store
pub fn app() -> Router {
    app_with_store(Arc::new(InMemoryStore::new()))
}

pub fn app_with_store(store: Arc<dyn EventStore>) -> Router {
    api::router(AppState::new(EventService::new(store)), DEFAULT_BODY_LIMIT)
}

/// Send one request and decode the body as JSON (plain text becomes a string)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Store whose every operation fails the way a dropped connection would
pub struct FailingStore;

#[async_trait]
impl EventStore for FailingStore {
    async fn list(&self) -> AppResult<Vec<EventRecord>> {
        Err(persistence_error("connection refused"))
    }

    async fn get(&self, _key: &str) -> AppResult<Option<EventRecord>> {
        Err(persistence_error("connection refused"))
    }

    async fn insert(&self, _record: &EventRecord) -> AppResult<()> {
        Err(persistence_error("connection refused"))
    }

    async fn replace(&self, _record: &EventRecord) -> AppResult<bool> {
        Err(persistence_error("connection refused"))
    }

    async fn remove(&self, _key: &str) -> AppResult<bool> {
        Err(persistence_error("connection refused"))
    }
}

/// Store where a delete lands right after every read, as when a DELETE
/// request races an update
#[derive(Default)]
pub struct VanishingStore {
    inner: InMemoryStore,
}

#[async_trait]
impl EventStore for VanishingStore {
    async fn list(&self) -> AppResult<Vec<EventRecord>> {
        self.inner.list().await
    }

    async fn get(&self, key: &str) -> AppResult<Option<EventRecord>> {
        let record = self.inner.get(key).await?;
        self.inner.remove(key).await?;
        Ok(record)
    }

    async fn insert(&self, record: &EventRecord) -> AppResult<()> {
        self.inner.insert(record).await
    }

    async fn replace(&self, record: &EventRecord) -> AppResult<bool> {
        self.inner.replace(record).await
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        self.inner.remove(key).await
    }
}
