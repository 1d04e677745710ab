//! HomePlate CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session store)
//! hp-cli migrate
//!
//! # Manage the admin-membership set
//! hp-cli admin grant -e someone@campus.edu
//! hp-cli admin revoke -e someone@campus.edu
//! hp-cli admin list
//!
//! # Seed the database from a YAML file
//! hp-cli seed -f seeds/dev.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `HOMEPLATE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hp-cli")]
#[command(author, version, about = "HomePlate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the admin-membership set
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with users, cooks, and dishes from a YAML file
    Seed {
        /// Path to the YAML seed file
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant admin membership to an existing user
    Grant {
        /// User email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke admin membership
    Revoke {
        /// User email address
        #[arg(short, long)]
        email: String,
    },
    /// List all admin members
    List,
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
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email).await?,
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
            AdminAction::List => commands::admin::list().await?,
        },
        Commands::Seed { file } => commands::seed::run(&file).await?,
    }
    Ok(())
}
