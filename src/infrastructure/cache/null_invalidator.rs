//! No-op invalidator used when no cache backend is configured.

use super::service::{CacheResult, CacheInvalidator};
use async_trait::async_trait;
use tracing::debug;

/// An invalidator that does nothing.
///
/// All operations succeed immediately.
pub struct NullInvalidator;

impl NullInvalidator {
    pub fn new() -> Self {
        debug!("Using NullInvalidator (cache invalidation disabled)");
        Self
    }
}

impl Default for NullInvalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInvalidator for NullInvalidator {
    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
