use super::models::EventRecord;
use super::store::EventStore;
use crate::error::{persistence_error, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client as RedisClient, ExistenceCheck, SetOptions};
use tracing::{debug, info, warn};

/// Redis key layout for one event collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisKeys {
    prefix: String,
}

impl RedisKeys {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches(':').to_string(),
        }
    }

    /// Sorted set of event keys, scored by insertion time
    pub fn index(&self) -> String {
        format!("{}:events", self.prefix)
    }

    /// JSON document for a single event
    pub fn event(&self, key: &str) -> String {
        format!("{}:event:{}", self.prefix, key)
    }
}

/// Redis-backed event store
pub struct RedisStore {
    conn: ConnectionManager,
    keys: RedisKeys,
}

impl RedisStore {
    /// Connect to Redis and return a store using `prefix` for its keys
    pub async fn connect(redis_url: &str, prefix: &str) -> AppResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| persistence_error(&format!("Failed to create Redis client: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| persistence_error(&format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            conn,
            keys: RedisKeys::new(prefix),
        })
    }

    fn decode(key: &str, json: &str) -> AppResult<EventRecord> {
        serde_json::from_str(json)
            .map_err(|e| persistence_error(&format!("Corrupt event document {}: {}", key, e)))
    }
}

#[async_trait]
impl EventStore for RedisStore {
    async fn list(&self) -> AppResult<Vec<EventRecord>> {
        let mut conn = self.conn.clone();

        let keys: Vec<String> = conn
            .zrange(self.keys.index(), 0, -1)
            .await
            .map_err(|e| persistence_error(&format!("Redis ZRANGE error: {}", e)))?;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let doc_keys: Vec<String> = keys.iter().map(|k| self.keys.event(k)).collect();
        let docs: Vec<Option<String>> = conn
            .mget(&doc_keys)
            .await
            .map_err(|e| persistence_error(&format!("Redis MGET error: {}", e)))?;

        let mut records = Vec::with_capacity(docs.len());
        for (key, doc) in keys.iter().zip(docs) {
            match doc {
                Some(json) => records.push(Self::decode(key, &json)?),
                // Index entry outlived its document
                None => warn!("Event {} is indexed but has no document", key),
            }
        }

        debug!("Listed {} events from Redis", records.len());
        Ok(records)
    }

    async fn get(&self, key: &str) -> AppResult<Option<EventRecord>> {
        let mut conn = self.conn.clone();

        let doc: Option<String> = conn
            .get(self.keys.event(key))
            .await
            .map_err(|e| persistence_error(&format!("Redis GET error: {}", e)))?;

        doc.map(|json| Self::decode(key, &json)).transpose()
    }

    async fn insert(&self, record: &EventRecord) -> AppResult<()> {
        let mut conn = self.conn.clone();

        let json = serde_json::to_string(record)
            .map_err(|e| persistence_error(&format!("JSON serialization error: {}", e)))?;

        // Document and index entry land together or not at all
        redis::pipe()
            .atomic()
            .set(self.keys.event(&record.key), &json)
            .ignore()
            .zadd(self.keys.index(), &record.key, Utc::now().timestamp_micros())
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| persistence_error(&format!("Redis SET/ZADD error: {}", e)))?;

        debug!("Stored event {}", record.key);
        Ok(())
    }

    async fn replace(&self, record: &EventRecord) -> AppResult<bool> {
        let mut conn = self.conn.clone();

        let json = serde_json::to_string(record)
            .map_err(|e| persistence_error(&format!("JSON serialization error: {}", e)))?;

        // XX: only overwrite a document that still exists
        let options = SetOptions::default().conditional_set(ExistenceCheck::XX);
        let reply: Option<String> = conn
            .set_options(self.keys.event(&record.key), &json, options)
            .await
            .map_err(|e| persistence_error(&format!("Redis SET error: {}", e)))?;

        if reply.is_none() {
            debug!("Event {} vanished before it could be replaced", record.key);
            return Ok(false);
        }

        debug!("Replaced event {}", record.key);
        Ok(true)
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();

        let (deleted, _): (i64, i64) = redis::pipe()
            .atomic()
            .del(self.keys.event(key))
            .zrem(self.keys.index(), key)
            .query_async(&mut conn)
            .await
            .map_err(|e| persistence_error(&format!("Redis DEL/ZREM error: {}", e)))?;

        Ok(deleted > 0)
    }
}
