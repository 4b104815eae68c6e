//! CLI administration tool for snaplink.
//!
//! Creates links, shows per-link statistics and runs database maintenance
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link (prompts for the URL if omitted)
//! cargo run --bin admin -- create --url https://example.com
//!
//! # Show clicks and health for a link
//! cargo run --bin admin -- stats --code abc123
//!
//! # Apply migrations
//! cargo run --bin admin -- migrate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server (`DATABASE_URL` or `DB_*`), plus
//! `BASE_URL` for printing short URLs.

use snaplink::application::services::{LinkService, StatsService, short_url};
use snaplink::config::{Config, mask_connection_string};
use snaplink::infrastructure::persistence::{self, PgClickRepository, PgLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Target URL
        #[arg(short, long)]
        url: Option<String>,

        /// Custom short code (random if omitted)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics for a link
    Stats {
        /// Short code
        #[arg(short, long)]
        code: String,
    },

    /// Apply pending database migrations
    Migrate,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = persistence::connect(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Create { url, code, yes } => create_link(&pool, &config, url, code, yes).await?,
        Commands::Stats { code } => show_stats(&pool, &code).await?,
        Commands::Migrate => run_migrations(&pool).await?,
        Commands::Db { action } => match action {
            DbAction::Check => check_database(&pool, &config).await?,
        },
    }

    pool.close().await;

    Ok(())
}

/// Creates a link through the same service the HTTP API uses.
async fn create_link(
    pool: &PgPool,
    config: &Config,
    url: Option<String>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let long_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("  URL:  {}", long_url.cyan());
    if let Some(ref c) = code {
        println!("  Code: {}", c.cyan());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = LinkService::new(Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))));

    let link = service
        .create_short_link(&long_url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!("  Target:    {}", link.long_url.cyan());
    println!(
        "  Short URL: {}",
        short_url(&config.base_url, &link.code).bright_white()
    );
    println!();

    Ok(())
}

/// Prints click total and last known health for a link.
async fn show_stats(pool: &PgPool, code: &str) -> Result<()> {
    println!("{}", "📊 Link Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let service = StatsService::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgClickRepository::new(pool)),
    );

    let stats = service
        .get_link_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let health = match stats.link.reachable {
        Some(true) => "REACHABLE".green(),
        Some(false) => "UNREACHABLE".red(),
        None => "NOT CHECKED".bright_black(),
    };

    println!("  Code:         {}", stats.link.code.cyan());
    println!("  Target:       {}", stats.link.long_url);
    println!(
        "  Created:      {}",
        stats
            .link
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:       {}",
        stats.total_clicks.to_string().bright_white().bold()
    );
    println!("  Health:       {}", health);
    if let Some(checked_at) = stats.link.last_checked_at {
        println!(
            "  Last checked: {}",
            checked_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
    println!();

    Ok(())
}

async fn run_migrations(pool: &PgPool) -> Result<()> {
    println!("{}", "🛠  Applying migrations".bright_blue().bold());

    persistence::migrate(pool)
        .await
        .context("Migration failed")?;

    println!("{}", "✅ Database schema is up to date".green().bold());

    Ok(())
}

/// Checks connectivity and reports row counts.
async fn check_database(pool: &PgPool, config: &Config) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());
    println!(
        "  Database: {}",
        mask_connection_string(&config.database_url).bright_black()
    );

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database query failed")?;

    println!("{}", "✅ Database connection OK".green().bold());

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .context("links table missing, run `admin migrate`")?;
    let clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    println!();
    println!("  Links:  {}", links.to_string().cyan().bold());
    println!("  Clicks: {}", clicks.to_string().cyan().bold());
    println!();

    Ok(())
}
