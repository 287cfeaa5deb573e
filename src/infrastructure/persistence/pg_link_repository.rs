//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AliasKind, Link, NewLink, Owner};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Row shape of the `links` table.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    short_code: String,
    original_url: String,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    custom_alias: Option<String>,
    is_active: bool,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            short_code: row.short_code,
            original_url: row.original_url,
            owner: Owner::from_column(row.user_id),
            created_at: row.created_at,
            expires_at: row.expires_at,
            click_count: row.click_count,
            custom_alias: row.custom_alias,
            is_active: row.is_active,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Short-code uniqueness is the `links_pkey` primary key; a violation surfaces
/// as [`AppError::AliasTaken`] through `From<sqlx::Error>`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links
                (short_code, original_url, user_id, created_at, expires_at, click_count, custom_alias, is_active)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
            RETURNING short_code, original_url, user_id, created_at, expires_at,
                      click_count, custom_alias, is_active
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .bind(new_link.owner.user_id())
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .bind(&new_link.custom_alias)
        .bind(new_link.is_active)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, original_url, user_id, created_at, expires_at,
                   click_count, custom_alias, is_active
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT short_code, original_url, user_id, created_at, expires_at,
                   click_count, custom_alias, is_active
            FROM links
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count_by_owner(&self, owner_id: i64, kind: AliasKind) -> Result<i64, AppError> {
        let query = match kind {
            AliasKind::Custom => {
                "SELECT COUNT(*) FROM links \
                 WHERE user_id = $1 AND custom_alias IS NOT NULL AND custom_alias <> ''"
            }
            AliasKind::Standard => {
                "SELECT COUNT(*) FROM links \
                 WHERE user_id = $1 AND (custom_alias IS NULL OR custom_alias = '')"
            }
        };

        let count: i64 = sqlx::query_scalar(query)
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, link: &Link) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE links SET original_url = $1 WHERE short_code = $2")
            .bind(&link.original_url)
            .bind(&link.short_code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "code": link.short_code }),
            ));
        }

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Link not found", json!({ "code": code })));
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
