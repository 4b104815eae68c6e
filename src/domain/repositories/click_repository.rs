//! Repository trait for click persistence.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for click tracking.
///
/// Shared by all click workers concurrently.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts all clicks recorded for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError>;
}
