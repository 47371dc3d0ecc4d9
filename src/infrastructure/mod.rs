//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Read-through projections of the link store (moka, Redis, no-op)
//! - [`persistence`] - Durable store and click counter implementations
//! - [`rate_limit`] - Per-client token buckets for the shorten endpoint

pub mod cache;
pub mod persistence;
pub mod rate_limit;
