//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries
//! are checked at runtime so the crate builds without a live database.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, enumeration and health updates
//! - [`PgClickRepository`] - Click recording and counting

pub mod pg_click_repository;
pub mod pg_link_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::config::Config;

/// Opens a connection pool sized from the configuration.
///
/// # Errors
///
/// Returns an error if the database cannot be reached within the connect timeout.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
}

/// Applies the embedded SQL migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
