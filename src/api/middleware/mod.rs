//! HTTP middleware for request processing.
//!
//! Rate limiting is not a layer: only shortening is limited, and the check
//! lives in the shorten service so a rejection never reaches code generation.

pub mod cors;
pub mod tracing;
