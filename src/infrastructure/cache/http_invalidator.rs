//! HTTP-based invalidation against the resolver's eviction endpoint.

use super::service::{CacheError, CacheInvalidator, CacheResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Sends `DELETE {base_url}/{short_code}` to the resolver cache.
///
/// Any 2xx answer counts as success.
pub struct HttpInvalidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInvalidator {
    /// Builds an invalidator whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> CacheResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CacheError::ConnectionError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }
}

#[async_trait]
impl CacheInvalidator for HttpInvalidator {
    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let response = self
            .client
            .delete(self.endpoint(short_code))
            .send()
            .await
            .map_err(|e| CacheError::OperationError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Rejected(status.as_u16()));
        }

        debug!("Cache INVALIDATE (http): {} -> {}", short_code, status);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        // The eviction endpoint only accepts DELETE; nothing safe to probe.
        true
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}
