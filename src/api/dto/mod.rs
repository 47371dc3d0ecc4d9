//! Data Transfer Objects for API requests and responses.
//!
//! Public payloads use camelCase field names.

pub mod analytics;
pub mod health;
pub mod shorten;
