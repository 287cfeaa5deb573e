//! Fire-and-forget dispatch of cache invalidations.
//!
//! Invalidation runs after the triggering mutation has committed and is not
//! part of its result. Failures are logged and counted, never returned.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::null_invalidator::NullInvalidator;
use super::service::CacheInvalidator;

/// Default upper bound for one invalidation attempt.
pub const DEFAULT_INVALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

/// How [`InvalidationDispatcher::notify_invalidated`] runs the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Spawn a detached task; the caller returns immediately.
    Background,
    /// Await the attempt before returning. Used by short-lived processes that
    /// would otherwise exit before a detached task runs.
    Inline,
}

/// Sends at most one invalidation per call, bounded by a timeout.
#[derive(Clone)]
pub struct InvalidationDispatcher {
    invalidator: Arc<dyn CacheInvalidator>,
    timeout: Duration,
    mode: DispatchMode,
}

impl InvalidationDispatcher {
    pub fn new(invalidator: Arc<dyn CacheInvalidator>, timeout: Duration) -> Self {
        Self {
            invalidator,
            timeout,
            mode: DispatchMode::Background,
        }
    }

    /// Dispatcher that never contacts anything.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullInvalidator::new()), DEFAULT_INVALIDATION_TIMEOUT)
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn backend(&self) -> &'static str {
        self.invalidator.backend()
    }

    pub async fn health_check(&self) -> bool {
        self.invalidator.health_check().await
    }

    /// Signals that `short_code` is stale. Never fails.
    pub async fn notify_invalidated(&self, short_code: &str) {
        match self.mode {
            DispatchMode::Background => {
                let invalidator = self.invalidator.clone();
                let short_code = short_code.to_string();
                let timeout = self.timeout;
                tokio::spawn(async move {
                    invalidate_once(invalidator.as_ref(), &short_code, timeout).await;
                });
            }
            DispatchMode::Inline => {
                invalidate_once(self.invalidator.as_ref(), short_code, self.timeout).await;
            }
        }
    }
}

async fn invalidate_once(invalidator: &dyn CacheInvalidator, short_code: &str, timeout: Duration) {
    let backend = invalidator.backend();

    match tokio::time::timeout(timeout, invalidator.invalidate(short_code)).await {
        Ok(Ok(())) => {
            debug!(short_code, backend, "Cache invalidated");
        }
        Ok(Err(e)) => {
            warn!(error = %e, short_code, backend, "Cache invalidation failed");
            metrics::counter!("cache_invalidation_failures_total", "backend" => backend)
                .increment(1);
        }
        Err(_) => {
            warn!(
                short_code,
                backend,
                timeout_ms = timeout.as_millis() as u64,
                "Cache invalidation timed out"
            );
            metrics::counter!("cache_invalidation_failures_total", "backend" => backend)
                .increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, CacheResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use tokio::sync::mpsc;

    struct ChannelInvalidator {
        tx: mpsc::UnboundedSender<String>,
        fail: bool,
    }

    #[async_trait]
    impl CacheInvalidator for ChannelInvalidator {
        async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
            let _ = self.tx.send(short_code.to_string());
            if self.fail {
                Err(CacheError::Rejected(503))
            } else {
                Ok(())
            }
        }

        async fn health_check(&self) -> bool {
            !self.fail
        }

        fn backend(&self) -> &'static str {
            "channel"
        }
    }

    struct SlowInvalidator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CacheInvalidator for SlowInvalidator {
        async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn backend(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_background_dispatch_reaches_invalidator_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = InvalidationDispatcher::new(
            Arc::new(ChannelInvalidator { tx, fail: false }),
            Duration::from_secs(1),
        );

        dispatcher.notify_invalidated("mybrand").await;

        let code = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(code.as_deref(), Some("mybrand"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = InvalidationDispatcher::new(
            Arc::new(ChannelInvalidator { tx, fail: true }),
            Duration::from_secs(1),
        )
        .with_mode(DispatchMode::Inline);

        dispatcher.notify_invalidated("abc").await;

        assert_eq!(rx.try_recv().ok().as_deref(), Some("abc"));
        assert!(!dispatcher.health_check().await);
    }

    #[tokio::test]
    async fn test_inline_dispatch_is_bounded_by_timeout() {
        let slow = Arc::new(SlowInvalidator {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = InvalidationDispatcher::new(slow.clone(), Duration::from_millis(50))
            .with_mode(DispatchMode::Inline);

        let started = Instant::now();
        dispatcher.notify_invalidated("abc").await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_background_dispatch_does_not_wait() {
        let slow = Arc::new(SlowInvalidator {
            calls: AtomicUsize::new(0),
        });
        let dispatcher = InvalidationDispatcher::new(slow, Duration::from_secs(30));

        let started = Instant::now();
        dispatcher.notify_invalidated("abc").await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_disabled_dispatcher() {
        let dispatcher = InvalidationDispatcher::disabled();
        assert_eq!(dispatcher.backend(), "disabled");
        assert!(dispatcher.health_check().await);
        dispatcher.notify_invalidated("anything").await;
    }
}
