//! In-memory link repository.
//!
//! Contents are lost on shutdown. Used by tests and `STORAGE=memory` local runs.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{AliasKind, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// A link store backed by a `HashMap` keyed by short code.
///
/// A single mutex makes `create` atomic, so two concurrent inserts of the same
/// code behave like the database primary key: one wins, the other gets
/// [`AppError::AliasTaken`].
#[derive(Clone, Debug, Default)]
pub struct MemoryLinkRepository {
    links: Arc<Mutex<HashMap<String, Link>>>,
}

impl MemoryLinkRepository {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed record, bypassing every business rule.
    ///
    /// Intended for seeding fixtures.
    pub async fn insert_raw(&self, link: Link) {
        self.links
            .lock()
            .await
            .insert(link.short_code.clone(), link);
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.links.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.lock().await.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().await;

        if links.contains_key(&new_link.short_code) {
            return Err(AppError::alias_taken(
                "Short code is already in use",
                json!({ "reason": "unique_violation" }),
            ));
        }

        let link = new_link.into_link();
        links.insert(link.short_code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.lock().await.get(code).cloned())
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let mut owned: Vec<Link> = self
            .links
            .lock()
            .await
            .values()
            .filter(|link| link.is_owned_by(owner_id))
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn count_by_owner(&self, owner_id: i64, kind: AliasKind) -> Result<i64, AppError> {
        let count = self
            .links
            .lock()
            .await
            .values()
            .filter(|link| link.is_owned_by(owner_id) && link.alias_kind() == kind)
            .count();

        Ok(count as i64)
    }

    async fn update(&self, link: &Link) -> Result<(), AppError> {
        match self.links.lock().await.get_mut(&link.short_code) {
            Some(stored) => {
                stored.original_url = link.original_url.clone();
                Ok(())
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "code": link.short_code }),
            )),
        }
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        match self.links.lock().await.remove(code) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Link not found", json!({ "code": code }))),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
