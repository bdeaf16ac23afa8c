use super::models::{Event, NewEvent};
use super::patch::EventPatch;
use super::store::EventStore;
use crate::error::{not_found_error, validation_error, AppResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const ID_REQUIRED: &str = "Event ID is required";
pub const NOT_FOUND: &str = "Event not found";

/// CRUD operations over the event collection
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// All events, keyed by `id`
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        let records = self.store.list().await?;
        Ok(records.into_iter().map(Event::from).collect())
    }

    /// Validate and persist a new event under a fresh id
    pub async fn create(&self, payload: NewEvent) -> AppResult<Event> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(validation_error(&format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let key = Uuid::new_v4().to_string();
        let record = payload
            .into_record(key)
            .ok_or_else(|| validation_error("Missing required fields"))?;

        self.store.insert(&record).await?;
        info!("Created event {} ({})", record.key, record.title);

        Ok(record.into())
    }

    /// Merge `patch` into the event identified by `id`
    pub async fn update(&self, id: Option<&str>, patch: EventPatch) -> AppResult<Event> {
        let id = require_id(id)?;

        let mut record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error(NOT_FOUND))?;

        patch.apply(&mut record);
        if record.title.trim().is_empty() {
            return Err(validation_error("title must not be empty"));
        }

        // Deleted between the read and the write
        if !self.store.replace(&record).await? {
            return Err(not_found_error(NOT_FOUND));
        }
        info!("Updated event {}", record.key);

        Ok(record.into())
    }

    /// Remove the event identified by `id`
    pub async fn delete(&self, id: Option<&str>) -> AppResult<()> {
        let id = require_id(id)?;

        if !self.store.remove(id).await? {
            return Err(not_found_error(NOT_FOUND));
        }

        info!("Deleted event {}", id);
        Ok(())
    }
}

/// An id that is absent or blank counts as missing. Ids are opaque, so a
/// present id is returned untouched.
pub fn require_id(id: Option<&str>) -> AppResult<&str> {
    match id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(validation_error(ID_REQUIRED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::events::models::{Category, Priority};
    use crate::events::store::InMemoryStore;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryStore::new()))
    }

    fn standup() -> NewEvent {
        NewEvent::new(
            "Standup",
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let service = service();
        let mut ids = HashSet::new();
        for _ in 0..5 {
            let event = service.create(standup()).await.unwrap();
            assert!(ids.insert(event.id));
        }

        let listed: HashSet<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_create_missing_fields_persists_nothing() {
        let service = service();

        let mut no_title = standup();
        no_title.title = None;
        let mut no_end = standup();
        no_end.end = None;

        for payload in [no_title, no_end, NewEvent::default()] {
            let err = service.create(payload).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let service = service();
        let mut payload = standup();
        payload.category = Some(Category::Work);
        payload.location = Some("Room 1".to_string());
        let created = service.create(payload).await.unwrap();

        let patch = EventPatch {
            title: Some("Standup v2".to_string()),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let updated = service.update(Some(&created.id), patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Standup v2");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.start, created.start);
        assert_eq!(updated.end, created.end);
        assert_eq!(updated.location, created.location);
        assert_eq!(updated.category, Some(Category::Work));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let service = service();
        let created = service.create(standup()).await.unwrap();

        let patch = EventPatch {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        let err = service.update(Some(&created.id), patch).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.list().await.unwrap()[0].title, "Standup");
    }

    #[tokio::test]
    async fn test_missing_and_unknown_ids() {
        let service = service();
        service.create(standup()).await.unwrap();

        let err = service.delete(None).await.unwrap_err();
        assert_eq!(err.message(), ID_REQUIRED);
        let err = service.update(Some("  "), EventPatch::default()).await.unwrap_err();
        assert_eq!(err.message(), ID_REQUIRED);

        let err = service.delete(Some("nope")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = service.update(Some("nope"), EventPatch::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_after_creates_and_deletes() {
        let service = service();
        let mut created = Vec::new();
        for _ in 0..4 {
            created.push(service.create(standup()).await.unwrap());
        }
        service.delete(Some(&created[1].id)).await.unwrap();
        service.delete(Some(&created[3].id)).await.unwrap();

        let ids: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![created[0].id.clone(), created[2].id.clone()]);
    }

    #[tokio::test]
    async fn test_ids_are_not_trimmed() {
        let service = service();
        let created = service.create(standup()).await.unwrap();
        let padded = format!(" {}", created.id);

        let err = service.delete(Some(&padded)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = service.update(Some(&padded), EventPatch::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
