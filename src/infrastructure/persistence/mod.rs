//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx
//! - [`MemoryLinkRepository`] - In-process map for tests and local development

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
