//! Redis-backed invalidation for resolvers that cache in a shared Redis.

use super::service::{CacheError, CacheInvalidator, CacheResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

/// Deletes the resolver's `short_code -> original_url` entry directly.
///
/// Uses `ConnectionManager` for automatic reconnection.
pub struct RedisInvalidator {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisInvalidator {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - Namespace the resolver uses for its keys (often empty)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis for cache invalidation");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn build_key(&self, short_code: &str) -> String {
        build_key(&self.key_prefix, short_code)
    }
}

fn build_key(prefix: &str, short_code: &str) -> String {
    format!("{}{}", prefix, short_code)
}

#[async_trait]
impl CacheInvalidator for RedisInvalidator {
    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis DEL failed: {}", e)))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE (redis): {}", key);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
