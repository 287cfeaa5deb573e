//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who a link belongs to.
///
/// Links created by unauthenticated callers are anonymous and can never be
/// claimed afterwards; a `User` owner is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Anonymous,
    User(i64),
}

impl Owner {
    /// Maps the nullable storage column to an owner.
    pub fn from_column(user_id: Option<i64>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    /// Returns the owner's user ID, `None` for anonymous links.
    pub fn user_id(self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Quota bucket a link falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    /// Caller-chosen short code.
    Custom,
    /// System-generated short code.
    Standard,
}

impl AliasKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Standard => "standard",
        }
    }
}

/// A shortened URL with ownership and lifecycle metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub short_code: String,
    pub original_url: String,
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    /// Equal to `short_code` when set.
    pub custom_alias: Option<String>,
    pub is_active: bool,
}

impl Link {
    pub fn alias_kind(&self) -> AliasKind {
        match self.custom_alias.as_deref() {
            Some(alias) if !alias.is_empty() => AliasKind::Custom,
            _ => AliasKind::Standard,
        }
    }

    /// Only custom-alias links may change their target after creation.
    pub fn is_editable(&self) -> bool {
        self.alias_kind() == AliasKind::Custom
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner == Owner::User(user_id)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }
}

/// Input data for creating a new link.
///
/// The store assigns `click_count = 0` on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub custom_alias: Option<String>,
    pub is_active: bool,
}

impl NewLink {
    /// Materializes the record as the store would return it after insert.
    pub fn into_link(self) -> Link {
        Link {
            short_code: self.short_code,
            original_url: self.original_url,
            owner: self.owner,
            created_at: self.created_at,
            expires_at: self.expires_at,
            click_count: 0,
            custom_alias: self.custom_alias,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(custom_alias: Option<&str>) -> Link {
        Link {
            short_code: custom_alias.unwrap_or("Xy3_kQ9aBc1-").to_string(),
            original_url: "https://example.com".to_string(),
            owner: Owner::User(7),
            created_at: Utc::now(),
            expires_at: None,
            click_count: 0,
            custom_alias: custom_alias.map(str::to_string),
            is_active: true,
        }
    }

    #[test]
    fn test_owner_from_column() {
        assert_eq!(Owner::from_column(None), Owner::Anonymous);
        assert_eq!(Owner::from_column(Some(3)), Owner::User(3));
        assert_eq!(Owner::User(3).user_id(), Some(3));
        assert_eq!(Owner::Anonymous.user_id(), None);
    }

    #[test]
    fn test_alias_kind_and_editability() {
        let custom = sample(Some("mybrand"));
        assert_eq!(custom.alias_kind(), AliasKind::Custom);
        assert!(custom.is_editable());

        let standard = sample(None);
        assert_eq!(standard.alias_kind(), AliasKind::Standard);
        assert!(!standard.is_editable());
    }

    #[test]
    fn test_empty_alias_counts_as_standard() {
        let mut link = sample(None);
        link.custom_alias = Some(String::new());
        assert_eq!(link.alias_kind(), AliasKind::Standard);
        assert!(!link.is_editable());
    }

    #[test]
    fn test_ownership() {
        let link = sample(None);
        assert!(link.is_owned_by(7));
        assert!(!link.is_owned_by(8));

        let anonymous = Link {
            owner: Owner::Anonymous,
            ..sample(None)
        };
        assert!(!anonymous.is_owned_by(7));
    }

    #[test]
    fn test_link_is_expired() {
        let mut link = sample(None);
        assert!(!link.is_expired());

        link.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(link.is_expired());

        link.expires_at = Some(Utc::now() + Duration::hours(1));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_new_link_into_link_starts_with_zero_clicks() {
        let now = Utc::now();
        let link = NewLink {
            short_code: "abc".to_string(),
            original_url: "https://rust-lang.org".to_string(),
            owner: Owner::Anonymous,
            created_at: now,
            expires_at: Some(now + Duration::hours(24)),
            custom_alias: None,
            is_active: true,
        }
        .into_link();

        assert_eq!(link.click_count, 0);
        assert_eq!(link.created_at, now);
        assert!(link.is_active);
    }
}
