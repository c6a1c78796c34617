pub mod memory;
pub mod redis_store;
pub mod storage;

pub use memory::MemoryStore;
pub use redis_store::{create_redis_client, RedisStore};
pub use storage::{GeneratedBatch, Storage, StorageKey};

use crate::error::AppResult;

/// Minimal string key-value store backing the persistence shim
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
