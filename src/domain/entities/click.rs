//! Click entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

/// A click persisted after a redirect was served.
///
/// Clicks are append-only: the pipeline never updates or deletes them.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
}

impl Click {
    pub fn new(id: i64, link_id: i64, clicked_at: DateTime<Utc>) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
        }
    }
}

/// Input data for recording a click.
///
/// `clicked_at` is the moment the redirect was served, not the moment the
/// worker got around to persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
}
