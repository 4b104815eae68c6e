//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with metadata.
///
/// `reachable` and `last_checked_at` stay `None` until the link monitor has
/// probed the target at least once. They are written by the monitor only.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub reachable: Option<bool>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a link that has never been health-checked.
    pub fn new(id: i64, code: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code,
            long_url,
            created_at,
            reachable: None,
            last_checked_at: None,
        }
    }

    /// Returns the link with the given health fields set.
    pub fn with_health(mut self, reachable: bool, checked_at: DateTime<Utc>) -> Self {
        self.reachable = Some(reachable);
        self.last_checked_at = Some(checked_at);
        self
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
}

/// Result of one liveness probe, as persisted by the link monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkHealth {
    pub link_id: i64,
    pub reachable: bool,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert!(link.reachable.is_none());
        assert!(link.last_checked_at.is_none());
    }

    #[test]
    fn test_link_with_health() {
        let checked = Utc::now();
        let link = Link::new(
            7,
            "down".to_string(),
            "https://gone.example".to_string(),
            Utc::now(),
        )
        .with_health(false, checked);

        assert_eq!(link.reachable, Some(false));
        assert_eq!(link.last_checked_at, Some(checked));
    }
}
