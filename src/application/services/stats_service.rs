//! Click statistics service.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// Aggregated statistics for a single link.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for retrieving click statistics.
///
/// Counts reflect only clicks the worker pool has already persisted; events
/// still sitting in the queue are not visible here.
pub struct StatsService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L, C> StatsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Retrieves the link behind `code` with its total click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link_stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "code": code })))?;

        let total_clicks = self.click_repository.count_by_link_id(link.id).await?;

        Ok(LinkStats { link, total_clicks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::Utc;

    #[tokio::test]
    async fn test_get_link_stats_success() {
        let mut link_repo = MockLinkRepository::new();
        let mut click_repo = MockClickRepository::new();

        link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| {
                Ok(Some(Link::new(
                    7,
                    code.to_string(),
                    "https://example.com".to_string(),
                    Utc::now(),
                )))
            });
        click_repo
            .expect_count_by_link_id()
            .withf(|link_id| *link_id == 7)
            .times(1)
            .returning(|_| Ok(5));

        let service = StatsService::new(Arc::new(link_repo), Arc::new(click_repo));

        let stats = service.get_link_stats("abc123").await.unwrap();

        assert_eq!(stats.total_clicks, 5);
        assert_eq!(stats.link.code, "abc123");
    }

    #[tokio::test]
    async fn test_get_link_stats_not_found() {
        let mut link_repo = MockLinkRepository::new();
        let mut click_repo = MockClickRepository::new();

        link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        click_repo.expect_count_by_link_id().times(0);

        let service = StatsService::new(Arc::new(link_repo), Arc::new(click_repo));

        let result = service.get_link_stats("nonexistent").await;

        match result.unwrap_err() {
            AppError::NotFound { message, .. } => assert_eq!(message, "Statistics not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_link_stats_propagates_count_error() {
        let mut link_repo = MockLinkRepository::new();
        let mut click_repo = MockClickRepository::new();

        link_repo.expect_find_by_code().returning(|code| {
            Ok(Some(Link::new(
                1,
                code.to_string(),
                "https://example.com".to_string(),
                Utc::now(),
            )))
        });
        click_repo
            .expect_count_by_link_id()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = StatsService::new(Arc::new(link_repo), Arc::new(click_repo));

        let result = service.get_link_stats("abc").await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }
}
