//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkHealth, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Must be safe for concurrent use: request handlers, the CLI and the link
/// monitor call it at the same time without extra locking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns every stored link, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Stores the outcome of a liveness probe on the link.
    ///
    /// Only the link monitor calls this.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link no longer exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_health(&self, health: LinkHealth) -> Result<(), AppError>;

    /// Cheap connectivity check used by the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if storage is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
