//! Core domain entities.
//!
//! - [`Link`] - A short code bound to its original URL
//! - [`NewLink`] - Insert payload for the durable store

pub mod link;

pub use link::{Link, NewLink};
