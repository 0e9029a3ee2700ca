//! CLI administration tool for linkhop.
//!
//! The serving process treats the blocklist as read-only; this tool is the
//! administration surface that writes it.
//!
//! # Usage
//!
//! ```bash
//! # Block a destination domain
//! cargo run --bin admin -- block domain malware.example.com
//!
//! # Block a user
//! cargo run --bin admin -- block user 6b9f1c2e-...-d3
//!
//! # Remove entries
//! cargo run --bin admin -- unblock domain malware.example.com
//! cargo run --bin admin -- unblock user 6b9f1c2e-...-d3
//!
//! # List everything currently blocked
//! cargo run --bin admin -- list
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use uuid::Uuid;

/// CLI tool for administering linkhop.
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
    /// Add a blocklist entry
    Block {
        #[command(subcommand)]
        target: BlockTarget,
    },

    /// Remove a blocklist entry
    Unblock {
        #[command(subcommand)]
        target: BlockTarget,
    },

    /// List all blocklist entries
    List,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// What a blocklist entry applies to.
#[derive(Subcommand)]
enum BlockTarget {
    /// A destination domain (exact host match)
    Domain { domain: String },

    /// A user id
    User { user_id: Uuid },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Block { target } => block(&pool, target).await?,
        Commands::Unblock { target } => unblock(&pool, target).await?,
        Commands::List => list(&pool).await?,
        Commands::Db { action } => match action {
            DbAction::Check => db_check(&pool).await?,
        },
    }

    Ok(())
}

/// Adds a blocklist entry after confirmation.
///
/// Blocking a domain takes effect immediately: existing links to it stop
/// redirecting on the next visit, and new links to it are refused.
async fn block(pool: &PgPool, target: BlockTarget) -> Result<()> {
    match target {
        BlockTarget::Domain { domain } => {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Block domain {}? All links to it will stop resolving.",
                    domain.cyan()
                ))
                .default(true)
                .interact()?;

            if !confirmed {
                println!("{}", "Cancelled".red());
                return Ok(());
            }

            sqlx::query("INSERT INTO blocked_domains (domain) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(&domain)
                .execute(pool)
                .await
                .context("Failed to block domain")?;

            println!("{} {}", "Blocked domain".green().bold(), domain.cyan());
        }
        BlockTarget::User { user_id } => {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Block user {}? They will no longer be able to create links.",
                    user_id.to_string().cyan()
                ))
                .default(true)
                .interact()?;

            if !confirmed {
                println!("{}", "Cancelled".red());
                return Ok(());
            }

            sqlx::query("INSERT INTO blocked_users (user_id) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(user_id)
                .execute(pool)
                .await
                .context("Failed to block user")?;

            println!(
                "{} {}",
                "Blocked user".green().bold(),
                user_id.to_string().cyan()
            );
        }
    }

    Ok(())
}

/// Removes a blocklist entry.
async fn unblock(pool: &PgPool, target: BlockTarget) -> Result<()> {
    match target {
        BlockTarget::Domain { domain } => {
            let result = sqlx::query("DELETE FROM blocked_domains WHERE domain = $1")
                .bind(&domain)
                .execute(pool)
                .await
                .context("Failed to unblock domain")?;

            if result.rows_affected() == 0 {
                println!("{} {}", "Not blocked:".yellow(), domain.cyan());
            } else {
                println!("{} {}", "Unblocked domain".green().bold(), domain.cyan());
            }
        }
        BlockTarget::User { user_id } => {
            let result = sqlx::query("DELETE FROM blocked_users WHERE user_id = $1")
                .bind(user_id)
                .execute(pool)
                .await
                .context("Failed to unblock user")?;

            if result.rows_affected() == 0 {
                println!(
                    "{} {}",
                    "Not blocked:".yellow(),
                    user_id.to_string().cyan()
                );
            } else {
                println!(
                    "{} {}",
                    "Unblocked user".green().bold(),
                    user_id.to_string().cyan()
                );
            }
        }
    }

    Ok(())
}

/// Lists all blocklist entries.
///
/// # Output Format
///
/// ```text
/// Blocked domains
///
///   Domain                              Since
///   ─────────────────────────────────────────────────
///   malware.example.com                 2025-07-02 10:30
/// ```
async fn list(pool: &PgPool) -> Result<()> {
    let domains: Vec<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT domain, created_at FROM blocked_domains ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .context("Failed to list blocked domains")?;

    let users: Vec<(Uuid, DateTime<Utc>)> =
        sqlx::query_as("SELECT user_id, created_at FROM blocked_users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .context("Failed to list blocked users")?;

    println!("{}", "Blocked domains".bright_blue().bold());
    println!();

    if domains.is_empty() {
        println!("{}", "  No blocked domains".yellow());
    } else {
        println!(
            "  {:<36} {:<20}",
            "Domain".bright_white().bold(),
            "Since".bright_white().bold()
        );
        println!("  {}", "─".repeat(56).bright_black());

        for (domain, created_at) in &domains {
            println!(
                "  {:<36} {}",
                domain.cyan(),
                created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
        }
    }

    println!();
    println!("{}", "Blocked users".bright_blue().bold());
    println!();

    if users.is_empty() {
        println!("{}", "  No blocked users".yellow());
    } else {
        println!(
            "  {:<36} {:<20}",
            "User id".bright_white().bold(),
            "Since".bright_white().bold()
        );
        println!("  {}", "─".repeat(56).bright_black());

        for (user_id, created_at) in &users {
            println!(
                "  {:<36} {}",
                user_id.to_string().cyan(),
                created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
        }
    }

    println!();
    println!(
        "  Total: {} domains, {} users",
        domains.len().to_string().bright_white().bold(),
        users.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Checks database connectivity.
async fn db_check(pool: &PgPool) -> Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Database check failed")?;

    println!("{}", "Database connection OK".green().bold());

    Ok(())
}
