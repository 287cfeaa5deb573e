//! Link lifecycle service: creation, update, deletion and owner listings.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{AliasKind, Identity, Link, NewLink, Owner, Role};
use crate::domain::policy::LinkPolicy;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::InvalidationDispatcher;
use crate::utils::code_generator::{generate_code, validate_custom_alias, validate_original_url};

/// Attempts at drawing a fresh random code after a store-reported collision.
const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Input for [`LinkService::create_link`].
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub original_url: String,
    /// An empty string is treated as no alias.
    pub custom_alias: Option<String>,
}

/// A user's current link counts, split by quota bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkUsage {
    pub custom: i64,
    pub standard: i64,
}

/// Orchestrates every mutation of link records.
///
/// Holds no mutable state of its own: the repository arbitrates concurrent
/// writes and the dispatcher runs invalidations detached from the caller.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    invalidation: InvalidationDispatcher,
    policy: LinkPolicy,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        invalidation: InvalidationDispatcher,
        policy: LinkPolicy,
    ) -> Self {
        Self {
            link_repository,
            invalidation,
            policy,
        }
    }

    pub fn invalidation(&self) -> &InvalidationDispatcher {
        &self.invalidation
    }

    /// Whether the link store answers.
    pub async fn store_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    /// Creates a short link on behalf of `identity`.
    ///
    /// # Flow
    ///
    /// 1. Validate the target URL and alias format
    /// 2. Enforce the per-kind quota for metered roles (Users)
    /// 3. Claim the alias, or generate a random code
    /// 4. Assign expiry from the role (Guests only)
    /// 5. Persist and return the stored record
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - malformed URL or alias
    /// - [`AppError::QuotaExceeded`] - User already holds the maximum of this kind
    /// - [`AppError::Forbidden`] - alias requested by a role that may not claim one
    /// - [`AppError::AliasTaken`] - alias already exists, including a lost insert race
    /// - [`AppError::Internal`] - store failure
    pub async fn create_link(
        &self,
        request: CreateLink,
        identity: &Identity,
    ) -> Result<Link, AppError> {
        validate_original_url(&request.original_url)?;

        let alias = request.custom_alias.filter(|alias| !alias.is_empty());
        if let Some(alias) = &alias {
            validate_custom_alias(alias)?;
        }
        let kind = if alias.is_some() {
            AliasKind::Custom
        } else {
            AliasKind::Standard
        };

        self.check_quota(identity, kind).await?;

        let expires_at_for = |now| self.policy.expiry_for(identity.role, now);

        let link = match alias {
            Some(alias) => {
                self.claim_alias(request.original_url, alias, identity, expires_at_for)
                    .await?
            }
            None => {
                self.create_with_generated_code(request.original_url, identity, expires_at_for)
                    .await?
            }
        };

        tracing::info!(
            short_code = %link.short_code,
            owner = ?link.owner,
            role = %identity.role,
            kind = kind.as_str(),
            "Link created"
        );
        metrics::counter!("links_created_total", "kind" => kind.as_str()).increment(1);

        Ok(link)
    }

    /// Lists every link owned by `owner_id`, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure.
    pub async fn get_links_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.find_all_by_owner(owner_id).await
    }

    /// Looks up a link by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.link_repository.find_by_code(code).await
    }

    /// Counts an owner's links per quota bucket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure.
    pub async fn count_links_by_owner(&self, owner_id: i64) -> Result<LinkUsage, AppError> {
        let custom = self
            .link_repository
            .count_by_owner(owner_id, AliasKind::Custom)
            .await?;
        let standard = self
            .link_repository
            .count_by_owner(owner_id, AliasKind::Standard)
            .await?;

        Ok(LinkUsage { custom, standard })
    }

    /// Points a custom-alias link at a new target.
    ///
    /// The cached resolution is invalidated after the store update commits.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - malformed URL
    /// - [`AppError::NotFound`] - unknown code (checked before authorization)
    /// - [`AppError::Unauthorized`] - caller is neither owner nor Admin
    /// - [`AppError::NotEditable`] - link has a system-generated code
    /// - [`AppError::Internal`] - store failure
    pub async fn update_link(
        &self,
        code: &str,
        original_url: String,
        identity: &Identity,
    ) -> Result<Link, AppError> {
        validate_original_url(&original_url)?;

        let mut link = self.find_existing(code).await?;
        authorize_mutation(&link, identity)?;

        if !link.is_editable() {
            return Err(AppError::not_editable(
                "Only custom alias links can be edited",
                json!({ "code": code }),
            ));
        }

        link.original_url = original_url;
        self.link_repository.update(&link).await?;

        tracing::info!(short_code = %link.short_code, role = %identity.role, "Link updated");
        self.invalidation.notify_invalidated(&link.short_code).await;

        Ok(link)
    }

    /// Removes a link permanently.
    ///
    /// The cached resolution is invalidated after the store delete commits.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown code (checked before authorization)
    /// - [`AppError::Unauthorized`] - caller is neither owner nor Admin
    /// - [`AppError::Internal`] - store failure
    pub async fn delete_link(&self, code: &str, identity: &Identity) -> Result<(), AppError> {
        let link = self.find_existing(code).await?;
        authorize_mutation(&link, identity)?;

        self.link_repository.delete(&link.short_code).await?;

        tracing::info!(short_code = %link.short_code, role = %identity.role, "Link deleted");
        self.invalidation.notify_invalidated(&link.short_code).await;

        Ok(())
    }

    async fn find_existing(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))
    }

    async fn check_quota(&self, identity: &Identity, kind: AliasKind) -> Result<(), AppError> {
        let Owner::User(owner_id) = identity.owner else {
            return Ok(());
        };
        if !identity.role.is_metered() {
            return Ok(());
        }

        let limit = self.policy.quota_for(kind);
        let count = self.link_repository.count_by_owner(owner_id, kind).await?;

        if count >= limit {
            return Err(AppError::quota_exceeded(
                format!(
                    "quota exceeded: max {} {} links allowed",
                    limit,
                    kind.as_str()
                ),
                json!({ "kind": kind, "limit": limit, "current": count }),
            ));
        }

        Ok(())
    }

    async fn claim_alias(
        &self,
        original_url: String,
        alias: String,
        identity: &Identity,
        expires_at_for: impl Fn(chrono::DateTime<Utc>) -> Option<chrono::DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        if !identity.role.may_claim_alias() || !identity.is_authenticated() {
            return Err(AppError::forbidden(
                "Custom alias is only for registered users",
                json!({ "role": identity.role }),
            ));
        }

        if self.link_repository.find_by_code(&alias).await?.is_some() {
            return Err(AppError::alias_taken(
                "Alias already taken",
                json!({ "alias": alias }),
            ));
        }

        let now = Utc::now();
        let new_link = NewLink {
            short_code: alias.clone(),
            original_url,
            owner: identity.owner,
            created_at: now,
            expires_at: expires_at_for(now),
            custom_alias: Some(alias.clone()),
            is_active: true,
        };

        // A concurrent claim between the lookup and the insert is rejected by
        // the store's uniqueness constraint.
        self.link_repository
            .create(new_link)
            .await
            .map_err(|e| match e {
                AppError::AliasTaken { .. } => {
                    AppError::alias_taken("Alias already taken", json!({ "alias": alias }))
                }
                other => other,
            })
    }

    async fn create_with_generated_code(
        &self,
        original_url: String,
        identity: &Identity,
        expires_at_for: impl Fn(chrono::DateTime<Utc>) -> Option<chrono::DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let now = Utc::now();
            let new_link = NewLink {
                short_code: generate_code()?,
                original_url: original_url.clone(),
                owner: identity.owner,
                created_at: now,
                expires_at: expires_at_for(now),
                custom_alias: None,
                is_active: true,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::AliasTaken { .. }) => {
                    tracing::warn!(attempt, "Generated short code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Admins may mutate any link; everyone else only their own.
fn authorize_mutation(link: &Link, identity: &Identity) -> Result<(), AppError> {
    if identity.role == Role::Admin {
        return Ok(());
    }

    match (link.owner, identity.owner) {
        (Owner::User(owner_id), Owner::User(caller_id)) if owner_id == caller_id => Ok(()),
        _ => Err(AppError::unauthorized(
            "You do not own this link",
            json!({ "code": link.short_code }),
        )),
    }
}
