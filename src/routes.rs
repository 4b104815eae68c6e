//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect
//! - `GET  /health`   - Health check: database, click queue
//! - `/api/v1/*`      - JSON API (see [`crate::api::routes`])
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// redirect handler reads the peer address for click events.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::v1_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
