//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkHealth, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, code, long_url, created_at, reachable, last_checked_at";

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters for every value; SQL is never built from user input.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "INSERT INTO links (code, long_url) VALUES ($1, $2) RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn update_health(&self, health: LinkHealth) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET reachable = $2, last_checked_at = $3
            WHERE id = $1
            "#,
        )
        .bind(health.link_id)
        .bind(health.reachable)
        .bind(health.checked_at)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "link_id": health.link_id }),
            ));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
