//! Key-value cache for generated explanations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Expiring string store keyed by `explanation:{id}`.
#[async_trait]
pub trait ExplanationCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Process-local cache. Entries are pruned lazily on access.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn prune_expired(entries: &mut HashMap<String, CacheEntry>) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait]
impl ExplanationCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        Self::prune_expired(&mut entries);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

/// Redis-backed cache (`GET` / `SET key value EX ttl`).
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Parse the URL. No connection is made until first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid Redis connection string.
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl ExplanationCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        use redis::AsyncCommands;

        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
