//! Application layer services implementing business logic.
//!
//! Services coordinate the code generator, rate limiter, cache and
//! repositories. Handlers call them and never touch a backend directly.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Rate-limited short link creation
//! - [`services::redirect_service::RedirectService`] - Cache-first code resolution
//! - [`services::stats_service::StatsService`] - Click counter reads

pub mod services;
