//! Redirect resolution and click production.

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::{ClickSender, EnqueueError};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Request metadata attached to a click.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// Resolves short codes and hands click events to the worker pool.
///
/// The redirect never waits on analytics: events are offered to the bounded
/// queue and dropped with a warning when it is saturated.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_service: Arc<LinkService<L>>,
    click_sender: ClickSender,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(link_service: Arc<LinkService<L>>, click_sender: ClickSender) -> Self {
        Self {
            link_service,
            click_sender,
        }
    }

    /// Returns the target URL for `code` and records the click in the background.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Internal`] if the lookup fails.
    pub async fn resolve(&self, code: &str, meta: RequestMeta) -> Result<String, AppError> {
        let link = self.link_service.get_link_by_code(code).await?;

        let event = ClickEvent::new(
            link.id,
            Utc::now(),
            meta.user_agent.as_deref(),
            meta.ip,
        );

        match self.click_sender.enqueue(event) {
            Ok(()) => {
                tracing::debug!(link_id = link.id, code, "click event enqueued");
            }
            Err(EnqueueError::Full) => {
                tracing::warn!(link_id = link.id, code, "click queue saturated, event dropped");
            }
            Err(EnqueueError::Closed) => {
                tracing::warn!(link_id = link.id, code, "click queue closed, event dropped");
            }
        }

        Ok(link.long_url)
    }
}
