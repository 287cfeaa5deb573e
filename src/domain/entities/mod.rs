//! Core domain entities.
//!
//! Entities are plain data structures; the rules that act on them live in
//! [`crate::domain::policy`] and [`crate::application::services`].
//!
//! - [`Link`] / [`NewLink`] - A shortened URL mapping and its creation input
//! - [`Owner`] - Anonymous or user-owned
//! - [`Identity`] / [`Role`] - The verified caller

pub mod identity;
pub mod link;

pub use identity::{Identity, Role, UnknownRole};
pub use link::{AliasKind, Link, NewLink, Owner};
