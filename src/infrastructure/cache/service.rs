//! Cache invalidation trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while invalidating a cached short code.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache invalidation rejected with status {0}")]
    Rejected(u16),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Signals a downstream resolver cache that a short code's mapping is stale.
///
/// Callers never propagate these errors; see
/// [`crate::infrastructure::cache::InvalidationDispatcher`].
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::HttpInvalidator`] - `DELETE` against an eviction endpoint
/// - [`crate::infrastructure::cache::RedisInvalidator`] - Deletes the resolver's Redis key
/// - [`crate::infrastructure::cache::NullInvalidator`] - No-op when nothing is configured
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Marks the cached mapping for `short_code` as stale.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] on transport failure or a non-success answer.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the invalidation backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
