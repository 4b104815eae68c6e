//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves click totals and health for a short link.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}/stats`
///
/// Only clicks already persisted by the worker pool are counted.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_link_stats(&code).await?;

    Ok(Json(stats.into()))
}
