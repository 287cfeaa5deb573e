//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the cache invalidation dispatcher,
//! and expose an API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, update, deletion and listings
//! - [`services::auth_service::AuthService`] - Bearer token verification

pub mod services;
