use super::models::EventRecord;
use crate::error::AppResult;

/// Document store trait for event records
#[async_trait::async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// All records, in insertion order
    async fn list(&self) -> AppResult<Vec<EventRecord>>;

    /// Fetch one record by key
    async fn get(&self, key: &str) -> AppResult<Option<EventRecord>>;

    /// Store a new record
    async fn insert(&self, record: &EventRecord) -> AppResult<()>;

    /// Overwrite an existing record, keeping its position. Returns false,
    /// writing nothing, when the record is gone.
    async fn replace(&self, record: &EventRecord) -> AppResult<bool>;

    /// Remove a record; returns whether it existed
    async fn remove(&self, key: &str) -> AppResult<bool>;
}

/// In-memory implementation of the store (for testing, and the fallback
/// when Redis cannot be reached)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: tokio::sync::RwLock<Vec<EventRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EventStore for InMemoryStore {
    async fn list(&self) -> AppResult<Vec<EventRecord>> {
        let events = self.events.read().await;
        Ok(events.clone())
    }

    async fn get(&self, key: &str) -> AppResult<Option<EventRecord>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.key == key).cloned())
    }

    async fn insert(&self, record: &EventRecord) -> AppResult<()> {
        let mut events = self.events.write().await;
        events.push(record.clone());
        Ok(())
    }

    async fn replace(&self, record: &EventRecord) -> AppResult<bool> {
        let mut events = self.events.write().await;
        match events.iter_mut().find(|e| e.key == record.key) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.key != key);
        Ok(events.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::models::Priority;
    use chrono::{TimeZone, Utc};

    fn record(key: &str, title: &str) -> EventRecord {
        EventRecord {
            key: key.to_string(),
            title: title.to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            all_day: false,
            description: None,
            location: None,
            category: None,
            priority: Priority::Low,
        }
    }

    #[tokio::test]
    async fn test_in_memory_keeps_insertion_order() {
        let store = InMemoryStore::new();
        store.insert(&record("b", "Second")).await.unwrap();
        store.insert(&record("a", "First")).await.unwrap();

        let keys: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_in_memory_replace_and_remove() {
        let store = InMemoryStore::new();
        store.insert(&record("a", "First")).await.unwrap();
        store.insert(&record("b", "Second")).await.unwrap();

        assert!(store.replace(&record("a", "Renamed")).await.unwrap());
        let all = store.list().await.unwrap();
        assert_eq!(all[0].title, "Renamed");
        assert_eq!(all.len(), 2);

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_replace_does_not_resurrect() {
        let store = InMemoryStore::new();
        store.insert(&record("a", "First")).await.unwrap();
        assert!(store.remove("a").await.unwrap());

        assert!(!store.replace(&record("a", "Late edit")).await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
        assert!(store.list().await.unwrap().is_empty());
    }
}
