//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a click, on its way to the worker pool.
///
/// Created by the redirect path and handed to the click queue, so the HTTP
/// response never waits on a database write. It is a message, not a stored
/// entity: exactly one worker consumes it, or it is dropped.
///
/// # Usage Flow
///
/// 1. Built in [`crate::application::services::RedirectService`] from request metadata
/// 2. Offered to the bounded queue (non-blocking)
/// 3. Taken by one [`crate::domain::click_worker`] task
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Arguments
    ///
    /// - `link_id` - Identity of the resolved link
    /// - `clicked_at` - When the redirect was served
    /// - `user_agent` - Optional User-Agent header
    /// - `ip` - Optional client IP address
    pub fn new(
        link_id: i64,
        clicked_at: DateTime<Utc>,
        user_agent: Option<&str>,
        ip: Option<String>,
    ) -> Self {
        Self {
            link_id,
            clicked_at,
            user_agent: user_agent.map(|s| s.to_string()),
            ip,
        }
    }

    /// Maps the event to the record a worker persists.
    ///
    /// User agent and IP are diagnostics only and are not stored.
    pub fn to_new_click(&self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            clicked_at: self.clicked_at,
        }
    }
}
