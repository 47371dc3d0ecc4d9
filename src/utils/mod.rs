//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation strategies
//! - [`url_validator`] - Destination URL validation
//! - [`client_key`] - Rate-limit key extraction from request headers

pub mod client_key;
pub mod code_generator;
pub mod url_validator;
