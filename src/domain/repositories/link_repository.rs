//! Repository trait for link storage.

use crate::domain::entities::{AliasKind, Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable storage of link records.
///
/// The store is the only arbiter of concurrent writes: short-code uniqueness
/// is enforced here, not in the service.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process map for tests and local runs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link owned by a user, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Counts a user's links of one alias kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_owner(&self, owner_id: i64, kind: AliasKind) -> Result<i64, AppError>;

    /// Persists the mutable fields of an existing link (`original_url`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this short code.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, link: &Link) -> Result<(), AppError>;

    /// Permanently removes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this short code.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, code: &str) -> Result<(), AppError>;

    /// Returns true if the backing store answers a trivial query.
    async fn health_check(&self) -> bool;
}
