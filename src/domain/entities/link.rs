//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL record as held by the durable store.
///
/// A code, once assigned, is permanently bound to the same `original_url`.
/// Records are created on shorten and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(code: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            original_url,
            created_at,
        }
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
}

impl NewLink {
    /// Materializes the record with the current timestamp.
    pub fn into_link(self) -> Link {
        Link::new(self.code, self.original_url, Utc::now())
    }
}
