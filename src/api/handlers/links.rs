//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{CreateLinkRequest, CreateLinkResponse};
use crate::application::services::short_url;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com", "custom_code": "my-link" }
/// ```
///
/// `custom_code` is optional; a random 8-character code is generated
/// otherwise.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "my-link",
///   "long_url": "https://example.com/",
///   "short_url": "http://localhost:3000/my-link"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL or custom code is invalid.
/// Returns 409 Conflict if the custom code is already taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(&payload.long_url, payload.custom_code)
        .await?;

    let response = CreateLinkResponse {
        short_url: short_url(&state.base_url, &link.code),
        code: link.code,
        long_url: link.long_url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
