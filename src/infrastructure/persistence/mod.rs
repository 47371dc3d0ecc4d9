//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] / [`PgStatsRepository`] - PostgreSQL via SQLx
//! - [`InMemoryLinkRepository`] / [`InMemoryStatsRepository`] - `DashMap`-backed,
//!   used when no database is configured

pub mod memory_link_repository;
pub mod memory_stats_repository;
pub mod pg_link_repository;
pub mod pg_stats_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use memory_stats_repository::InMemoryStatsRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
