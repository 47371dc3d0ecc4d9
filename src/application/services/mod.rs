//! Business logic services for the application layer.

pub mod redirect_service;
pub mod shorten_service;
pub mod stats_service;

pub use redirect_service::RedirectService;
pub use shorten_service::{ShortenService, ShortenedLink};
pub use stats_service::{LinkClicks, StatsService};
