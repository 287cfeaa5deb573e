//! Infrastructure layer for external integrations.
//!
//! - [`cache`] - Resolver-cache invalidation (HTTP, Redis and no-op backends)
//! - [`persistence`] - Link store implementations

pub mod cache;
pub mod persistence;
