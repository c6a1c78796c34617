use std::collections::HashMap;

use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::AppResult;

/// In-process store, lost on restart
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
