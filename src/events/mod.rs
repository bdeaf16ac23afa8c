pub mod models;
pub mod patch;
pub mod redis_store;
pub mod service;
pub mod store;

pub use models::{Category, Event, EventRecord, NewEvent, Priority};
pub use patch::EventPatch;
pub use redis_store::RedisStore;
pub use service::EventService;
pub use store::{EventStore, InMemoryStore};
