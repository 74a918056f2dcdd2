//! Juniper Market CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! jm-cli migrate
//!
//! # Seed the catalog with sample products
//! jm-cli seed
//!
//! # Grant the admin flag to a user
//! jm-cli admin promote -u freya
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with sample products
//! - `admin promote|demote` - Manage the admin flag on users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jm-cli")]
#[command(author, version, about = "Juniper Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with sample products
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin flag to an existing user
    Promote {
        /// Username to promote
        #[arg(short, long)]
        username: String,
    },
    /// Remove the admin flag from a user
    Demote {
        /// Username to demote
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Promote { username } => {
                commands::admin::set_admin(&username, true).await?;
            }
            AdminAction::Demote { username } => {
                commands::admin::set_admin(&username, false).await?;
            }
        },
    }
    Ok(())
}
