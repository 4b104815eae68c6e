//! Application layer services implementing business logic.
//!
//! Services consume the repository traits and the click queue, and give the
//! HTTP handlers and the admin CLI a small API to call.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and retrieval
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click production
//! - [`services::stats_service::StatsService`] - Per-link click totals

pub mod services;
