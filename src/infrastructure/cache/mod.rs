//! Downstream resolver-cache invalidation.
//!
//! Provides a [`CacheInvalidator`] trait with three implementations and the
//! [`InvalidationDispatcher`] that runs them without blocking callers:
//! - [`HttpInvalidator`] - `DELETE` against the resolver's eviction endpoint
//! - [`RedisInvalidator`] - Deletes the key from the resolver's Redis
//! - [`NullInvalidator`] - No-op when nothing is configured

mod dispatcher;
mod http_invalidator;
mod null_invalidator;
mod redis_invalidator;
mod service;

pub use dispatcher::{DEFAULT_INVALIDATION_TIMEOUT, DispatchMode, InvalidationDispatcher};
pub use http_invalidator::HttpInvalidator;
pub use null_invalidator::NullInvalidator;
pub use redis_invalidator::RedisInvalidator;
pub use service::{CacheError, CacheInvalidator, CacheResult};

use std::sync::Arc;
use std::time::Duration;

/// Where invalidation signals should go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationSettings {
    pub eviction_url: Option<String>,
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub timeout: Duration,
}

/// Builds the dispatcher for the configured backend.
///
/// The HTTP eviction endpoint wins over Redis when both are set. A Redis
/// connection failure degrades to [`NullInvalidator`] with a warning, matching
/// the fail-open treatment of the cache elsewhere.
///
/// # Errors
///
/// Returns [`CacheError::ConnectionError`] if the HTTP client cannot be built.
pub async fn build_dispatcher(
    settings: &InvalidationSettings,
) -> CacheResult<InvalidationDispatcher> {
    let invalidator: Arc<dyn CacheInvalidator> = if let Some(url) = &settings.eviction_url {
        tracing::info!("Cache invalidation enabled (HTTP)");
        Arc::new(HttpInvalidator::new(url, settings.timeout)?)
    } else if let Some(redis_url) = &settings.redis_url {
        match RedisInvalidator::connect(redis_url, &settings.key_prefix).await {
            Ok(redis) => {
                tracing::info!("Cache invalidation enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Cache invalidation disabled.", e);
                Arc::new(NullInvalidator::new())
            }
        }
    } else {
        tracing::info!("Cache invalidation disabled (no endpoint configured)");
        Arc::new(NullInvalidator::new())
    };

    Ok(InvalidationDispatcher::new(invalidator, settings.timeout))
}
