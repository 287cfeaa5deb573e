//! Caller identity as supplied by the authentication service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::link::Owner;

/// Closed set of caller roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not one of `Guest`, `User`, `Admin`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Guest" => Ok(Self::Guest),
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Already-verified principal attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub owner: Owner,
    pub role: Role,
}

impl Identity {
    pub fn new(owner: Owner, role: Role) -> Self {
        Self { owner, role }
    }

    /// Unauthenticated caller.
    pub fn guest() -> Self {
        Self::new(Owner::Anonymous, Role::Guest)
    }

    pub fn user(user_id: i64) -> Self {
        Self::new(Owner::User(user_id), Role::User)
    }

    pub fn admin(user_id: i64) -> Self {
        Self::new(Owner::User(user_id), Role::Admin)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.owner, Owner::User(_))
    }
}
