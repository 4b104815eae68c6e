//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService, StatsService};
use crate::domain::click_queue::ClickSender;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Services and handles shared across requests.
///
/// Cheap to clone: every field is reference counted. Repositories are held as
/// trait objects so tests can swap PostgreSQL for in-memory storage.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub stats_service: Arc<StatsService<dyn LinkRepository, dyn ClickRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    /// Producer side of the click queue, also inspected by the health check.
    pub click_sender: ClickSender,
    /// Public prefix of generated short URLs.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
        click_sender: ClickSender,
        base_url: impl Into<Arc<str>>,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(link_repository.clone()));
        let stats_service = Arc::new(StatsService::new(link_repository, click_repository));
        let redirect_service = Arc::new(RedirectService::new(
            link_service.clone(),
            click_sender.clone(),
        ));

        Self {
            link_service,
            stats_service,
            redirect_service,
            click_sender,
            base_url: base_url.into(),
        }
    }
}
