//! Repository trait for the durable link store.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// The system of record mapping short codes to original URLs.
///
/// The store is authoritative: cache entries are projections of its records
/// and code uniqueness is decided by [`LinkRepository::insert`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Atomically inserts a new link.
    ///
    /// If two callers race on the same code, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken. This is the
    /// collision signal consumed by the shorten retry loop.
    ///
    /// Returns [`AppError::Unavailable`] when the store cannot be reached.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Looks up a link by its short code. Pure read.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if the code is unknown
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the store cannot be reached.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
