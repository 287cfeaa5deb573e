//! Domain layer containing business entities, rules and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`policy`] - Role-keyed decision table for quotas, aliases and expiry
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits are implemented in
//! [`crate::infrastructure::persistence`].

pub mod entities;
pub mod policy;
pub mod repositories;
