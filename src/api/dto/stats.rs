//! DTOs for per-link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkStats;

/// Link metadata, persisted click total and last known health.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub total_clicks: i64,
    /// `None` until the link monitor has checked the link once.
    pub reachable: Option<bool>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            code: stats.link.code,
            long_url: stats.link.long_url,
            created_at: stats.link.created_at,
            total_clicks: stats.total_clicks,
            reachable: stats.link.reachable,
            last_checked_at: stats.link.last_checked_at,
        }
    }
}
