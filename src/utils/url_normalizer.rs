//! Target URL validation and normalization.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a target URL before it is stored.
///
/// Only `http` and `https` URLs with a host are accepted. The host is
/// lowercased and default ports dropped by the parser; the fragment is
/// removed because browsers never send it to the target anyway.
///
/// # Errors
///
/// - [`UrlNormalizationError::InvalidFormat`] for unparsable input
/// - [`UrlNormalizationError::UnsupportedProtocol`] for other schemes
/// - [`UrlNormalizationError::MissingHost`] for URLs without a host
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url.to_string())
}
