//! Link creation and retrieval service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;

/// Attempts at finding a free random code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for creating and retrieving shortened links.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link for `long_url`.
    ///
    /// - If `custom_code` is provided, validates and uses it
    /// - Otherwise generates a random code, retrying on collision
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid.
    /// Returns [`AppError::Conflict`] if the custom code is already taken.
    /// Returns [`AppError::Internal`] if no free code could be generated.
    pub async fn create_short_link(
        &self,
        long_url: &str,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let normalized_url = normalize_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let code = match custom_code {
            Some(custom) => {
                validate_custom_code(&custom)?;

                if self.link_repository.find_by_code(&custom).await?.is_some() {
                    return Err(AppError::conflict(
                        "Custom code already exists",
                        json!({ "code": custom }),
                    ));
                }

                custom
            }
            None => self.generate_unique_code().await?,
        };

        let link = self
            .link_repository
            .create(NewLink {
                code,
                long_url: normalized_url,
            })
            .await?;

        tracing::info!(link_id = link.id, code = %link.code, "short link created");

        Ok(link)
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Checks that link storage answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code()?;

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            tracing::warn!(attempt, "code collision, retrying");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Builds the public short URL for `code`.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
