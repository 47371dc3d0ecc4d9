//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click aggregation worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect service serves a 302
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel (never blocks)
//! 3. [`click_worker::run_click_worker`] folds events into per-code increments
//! 4. Increments are written via [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
