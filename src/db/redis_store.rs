use redis::{AsyncCommands, Client};

use super::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client for the key-value store
///
/// Opening the client only validates the URL; connections are made per call.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed store; values are kept without expiry
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
}

impl RedisStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
