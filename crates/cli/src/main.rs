//! Blush CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the shop and session tables
//! blush-cli migrate
//!
//! # Create an admin account (password from BLUSH_ADMIN_PASSWORD)
//! blush-cli admin create -e admin@example.com -n "Store Manager"
//!
//! # Load products from a YAML file
//! blush-cli seed products crates/cli/seed/products.yaml
//! ```
//!
//! Every command reads `DATABASE_URL` (from the environment or `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "blush-cli")]
#[command(author, version, about = "Blush Cosmetics CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load data into the store
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: Option<String>,

        /// Environment variable holding the password
        #[arg(long, default_value = "BLUSH_ADMIN_PASSWORD")]
        password_env: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert every product listed in a YAML file
    Products {
        /// Path to the YAML file
        file: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password_env,
            } => {
                commands::admin::create_user(&email, name, &password_env).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
    }
    Ok(())
}
