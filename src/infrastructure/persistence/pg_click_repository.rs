//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::{AppError, map_sqlx_error};

/// PostgreSQL repository for click tracking.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn create_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO link_clicks (link_id, clicked_at)
            VALUES ($1, $2)
            RETURNING id, link_id, clicked_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.clicked_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            let is_fk_violation = e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());
            if is_fk_violation {
                AppError::bad_request(
                    "Link does not exist",
                    json!({ "link_id": new_click.link_id }),
                )
            } else {
                map_sqlx_error(e)
            }
        })
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
