//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::application::services::RequestMeta;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// A click event is offered to the bounded click queue before answering. If
/// the queue is full the click is dropped with a warning; the redirect is
/// served either way and never waits on the database write.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the lookup fails.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let meta = RequestMeta {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ip: Some(addr.ip().to_string()),
    };

    let long_url = state.redirect_service.resolve(&code, meta).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]))
}
