//! Domain layer containing business entities and the click pipeline.
//!
//! Nothing in here knows about HTTP or PostgreSQL; storage is reached only
//! through the repository traits.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click message passed from redirects to workers
//! - [`click_queue`] - Bounded, non-blocking click event queue
//! - [`click_worker`] - Worker pool persisting click events
//! - [`link_monitor`] - Periodic link liveness scans
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::RedirectService`] resolves the link
//! 2. A [`click_event::ClickEvent`] is offered to the queue; dropped if full
//! 3. One [`click_worker`] task takes it and persists it via
//!    [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod link_monitor;
pub mod repositories;
