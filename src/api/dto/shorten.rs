//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The target URL (must be HTTP/HTTPS; checked again on normalization).
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,

    /// Optional caller-chosen short code.
    #[validate(length(min = 4, max = 32, message = "Custom code must be 4-32 characters"))]
    pub custom_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub code: String,
    pub long_url: String,
    pub short_url: String,
}
