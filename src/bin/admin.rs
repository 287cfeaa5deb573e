//! CLI administration tool for the link management service.
//!
//! Provides commands for inspecting and removing links, viewing statistics,
//! minting development tokens, and database diagnostics without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List a user's links with quota usage
//! cargo run --bin admin -- links list --owner 42
//!
//! # Show a single link
//! cargo run --bin admin -- links show mybrand
//!
//! # Delete a link (invalidates the resolver cache)
//! cargo run --bin admin -- links delete mybrand
//!
//! # Issue a token for local testing
//! cargo run --bin admin -- token issue --user-id 42 --role User
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for `links`, `stats` and `db`)
//! - `JWT_SECRET` (required for `token`)
//! - `CACHE_EVICTION_URL` / `REDIS_URL` / `REDIS_HOST` (optional, used by `links delete`)

use link_management_service::application::services::{AuthService, LinkService};
use link_management_service::config;
use link_management_service::domain::entities::{Identity, Link, Role};
use link_management_service::domain::repositories::LinkRepository;
use link_management_service::infrastructure::cache::{
    DispatchMode, InvalidationDispatcher, build_dispatcher,
};
use link_management_service::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// User ID recorded for deletions performed from the CLI.
const CLI_ADMIN_ID: i64 = 0;

/// CLI tool for managing the link management service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and remove links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Issue access tokens for development
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List all links owned by a user
    List {
        /// Owner user ID
        #[arg(short, long)]
        owner: i64,
    },

    /// Show a single link
    Show {
        /// Short code
        code: String,
    },

    /// Delete a link as an administrator
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Sign a token with JWT_SECRET
    Issue {
        #[arg(short, long)]
        user_id: i64,

        /// Guest, User or Admin
        #[arg(short, long, default_value = "User")]
        role: Role,

        /// Lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Links { action } => {
            let pool = connect().await?;
            handle_links_action(action, &pool).await?;
        }
        Commands::Stats => handle_stats(&connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches link commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let repo: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match action {
        LinksAction::List { owner } => {
            let service =
                LinkService::new(repo, InvalidationDispatcher::disabled(), Default::default());
            list_links(&service, owner).await?;
        }
        LinksAction::Show { code } => {
            let link = repo
                .find_by_code(&code)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("Link not found")?;
            print_link_details(&link);
        }
        LinksAction::Delete { code, yes } => {
            let dispatcher = build_dispatcher(&config::invalidation_settings_from_env())
                .await
                .map_err(|e| anyhow::anyhow!("Cache invalidation setup failed: {}", e))?
                .with_mode(DispatchMode::Inline);
            let service = LinkService::new(repo, dispatcher, Default::default());
            delete_link(&service, &code, yes).await?;
        }
    }

    Ok(())
}

/// Lists a user's links with quota usage.
///
/// # Output Format
///
/// ```text
/// Links of user 42
///
///   Code             Kind      Created           Destination
///   ──────────────────────────────────────────────────────────────────────
///   mybrand          custom    2025-01-15 10:30  https://example.com
///
///   Usage: 1 custom, 0 standard
/// ```
async fn list_links(service: &LinkService<dyn LinkRepository>, owner: i64) -> Result<()> {
    println!("{}", format!("Links of user {}", owner).bright_blue().bold());
    println!();

    let links = service
        .get_links_by_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
    let usage = service
        .count_links_by_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<16} {:<9} {:<17} {}",
        "Code".bright_white().bold(),
        "Kind".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for link in &links {
        println!(
            "  {:<16} {:<9} {:<17} {}",
            link.short_code.cyan(),
            link.alias_kind().as_str(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Usage: {} custom, {} standard",
        usage.custom.to_string().bright_white().bold(),
        usage.standard.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn print_link_details(link: &Link) {
    println!("{}", "Link".bright_blue().bold());
    println!();
    println!("  Code:        {}", link.short_code.cyan());
    println!("  Destination: {}", link.original_url);
    match link.owner.user_id() {
        Some(id) => println!("  Owner:       user {}", id),
        None => println!("  Owner:       {}", "anonymous".bright_black()),
    }
    println!("  Kind:        {}", link.alias_kind().as_str());
    println!(
        "  Created:     {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match link.expires_at {
        Some(at) if link.is_expired() => {
            println!("  Expires:     {} {}", at.format("%Y-%m-%d %H:%M:%S UTC"), "(expired)".red())
        }
        Some(at) => println!("  Expires:     {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Expires:     {}", "never".bright_black()),
    }
    println!("  Clicks:      {}", link.click_count);
    println!(
        "  Status:      {}",
        if link.is_active {
            "ACTIVE".green()
        } else {
            "INACTIVE".red()
        }
    );
    println!();
}

/// Deletes a link through the link service with an admin identity.
///
/// The resolver cache is invalidated before the process exits.
async fn delete_link(
    service: &LinkService<dyn LinkRepository>,
    code: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code:        {}", link.short_code.cyan());
    println!("  Destination: {}", link.original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link permanently?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code, &Identity::admin(CLI_ADMIN_ID))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "Link deleted".green().bold());
    println!();

    Ok(())
}

/// Dispatches token commands.
fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Issue {
            user_id,
            role,
            ttl_hours,
        } => {
            let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
            let token = AuthService::new(&secret)
                .issue_token(user_id, role, chrono::Duration::hours(ttl_hours))
                .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

            println!("{}", "Access token".bright_blue().bold());
            println!();
            println!("  User:  {}", user_id.to_string().cyan());
            println!("  Role:  {}", role.as_str().cyan());
            println!("  TTL:   {}h", ttl_hours);
            println!("  Token: {}", token.bright_yellow());
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:8080/api/links",
                token.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links, split by kind
/// - Anonymous links and how many have expired
/// - Number of distinct owners
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let (total, custom, anonymous, expired, owners): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE custom_alias IS NOT NULL),
            COUNT(*) FILTER (WHERE user_id IS NULL),
            COUNT(*) FILTER (WHERE expires_at IS NOT NULL AND expires_at <= NOW()),
            COUNT(DISTINCT user_id)
        FROM links
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!("  Links:         {}", total.to_string().bright_green().bold());
    println!("    custom:      {}", custom.to_string().bright_green());
    println!(
        "    standard:    {}",
        (total - custom).to_string().bright_green()
    );
    println!("  Anonymous:     {}", anonymous.to_string().bright_green());
    println!("  Expired:       {}", expired.to_string().bright_yellow());
    println!("  Owners:        {}", owners.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
