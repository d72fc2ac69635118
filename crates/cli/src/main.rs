//! FurnitureCo CLI - seeding and admin role management.
//!
//! # Usage
//!
//! ```bash
//! # Create any missing About sections and the contact-info row
//! fco-cli seed
//!
//! # Grant, revoke and list the admin role
//! fco-cli admin grant --user-id 3b241101-e2bb-4255-8caf-4136c566a962
//! fco-cli admin revoke --user-id 3b241101-e2bb-4255-8caf-4136c566a962
//! fco-cli admin list
//! ```
//!
//! # Commands
//!
//! - `seed` - Seed managed content (idempotent)
//! - `admin` - Manage `user_roles` admin rows
//!
//! Every command runs with the service-role key, bypassing row-level
//! policies. See [`config::CliConfig`] for the environment it reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use furnitureco_core::UserId;
use furnitureco_store::{Caller, SupabaseClient};
use secrecy::ExposeSecret;

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "fco-cli")]
#[command(author, version, about = "FurnitureCo CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert missing About sections (with default copy) and the contact-info row
    Seed,
    /// Manage admin roles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to a user
    Grant {
        /// Auth user ID (UUID)
        #[arg(short, long)]
        user_id: UserId,
    },
    /// Revoke the admin role from a user
    Revoke {
        /// Auth user ID (UUID)
        #[arg(short, long)]
        user_id: UserId,
    },
    /// List users holding the admin role
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
    let config = CliConfig::from_env()?;
    let client = SupabaseClient::new(&config.supabase)?;
    let caller = Caller::Bearer(config.service_role_key.expose_secret());

    match cli.command {
        Commands::Seed => {
            let report = commands::seed::run(&client, caller).await?;
            tracing::info!(
                sections_created = report.sections_created,
                contact_created = report.contact_created,
                "Seeding complete"
            );
        }
        Commands::Admin { action } => match action {
            AdminAction::Grant { user_id } => {
                commands::admin::grant(&client, caller, user_id).await?;
            }
            AdminAction::Revoke { user_id } => {
                commands::admin::revoke(&client, caller, user_id).await?;
            }
            AdminAction::List => {
                commands::admin::list(&client, caller).await?;
            }
        },
    }
    Ok(())
}
