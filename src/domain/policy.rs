//! Role-keyed rules for link creation.
//!
//! | Role  | Metered | May claim alias | Links expire |
//! |-------|---------|-----------------|--------------|
//! | Guest | no      | no              | yes          |
//! | User  | yes     | yes             | no           |
//! | Admin | no      | yes             | no           |

use chrono::{DateTime, Duration, Utc};

use super::entities::{AliasKind, Role};

pub const DEFAULT_CUSTOM_ALIAS_QUOTA: i64 = 2;
pub const DEFAULT_STANDARD_LINK_QUOTA: i64 = 20;
pub const DEFAULT_GUEST_LINK_TTL_HOURS: i64 = 24;

impl Role {
    /// Whether link creation counts against a per-owner quota.
    pub fn is_metered(self) -> bool {
        match self {
            Role::User => true,
            Role::Guest | Role::Admin => false,
        }
    }

    pub fn may_claim_alias(self) -> bool {
        match self {
            Role::User | Role::Admin => true,
            Role::Guest => false,
        }
    }

    pub fn creates_expiring_links(self) -> bool {
        match self {
            Role::Guest => true,
            Role::User | Role::Admin => false,
        }
    }
}

/// Tunable limits applied by the link service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    pub custom_alias_quota: i64,
    pub standard_link_quota: i64,
    pub guest_link_ttl: Duration,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            custom_alias_quota: DEFAULT_CUSTOM_ALIAS_QUOTA,
            standard_link_quota: DEFAULT_STANDARD_LINK_QUOTA,
            guest_link_ttl: Duration::hours(DEFAULT_GUEST_LINK_TTL_HOURS),
        }
    }
}

impl LinkPolicy {
    /// Maximum number of live links of `kind` a metered owner may hold.
    pub fn quota_for(&self, kind: AliasKind) -> i64 {
        match kind {
            AliasKind::Custom => self.custom_alias_quota,
            AliasKind::Standard => self.standard_link_quota,
        }
    }

    /// Expiry assigned to a link created by `role` at `now`.
    pub fn expiry_for(&self, role: Role, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        role.creates_expiring_links()
            .then(|| now + self.guest_link_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        assert!(!Role::Guest.is_metered());
        assert!(Role::User.is_metered());
        assert!(!Role::Admin.is_metered());

        assert!(!Role::Guest.may_claim_alias());
        assert!(Role::User.may_claim_alias());
        assert!(Role::Admin.may_claim_alias());

        assert!(Role::Guest.creates_expiring_links());
        assert!(!Role::User.creates_expiring_links());
        assert!(!Role::Admin.creates_expiring_links());
    }

    #[test]
    fn test_default_quotas() {
        let policy = LinkPolicy::default();
        assert_eq!(policy.quota_for(AliasKind::Custom), 2);
        assert_eq!(policy.quota_for(AliasKind::Standard), 20);
    }

    #[test]
    fn test_expiry_only_for_guests() {
        let policy = LinkPolicy::default();
        let now = Utc::now();

        assert_eq!(
            policy.expiry_for(Role::Guest, now),
            Some(now + Duration::hours(24))
        );
        assert_eq!(policy.expiry_for(Role::User, now), None);
        assert_eq!(policy.expiry_for(Role::Admin, now), None);
    }

    #[test]
    fn test_custom_ttl() {
        let policy = LinkPolicy {
            guest_link_ttl: Duration::hours(1),
            ..LinkPolicy::default()
        };
        let now = Utc::now();
        assert_eq!(
            policy.expiry_for(Role::Guest, now),
            Some(now + Duration::hours(1))
        );
    }
}
