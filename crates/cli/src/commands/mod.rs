//! Command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use blush_core::ProductError;
use blush_core::config::{ConfigError, Env};
use blush_store::StoreError;
use blush_store::accounts::AccountError;

/// Errors from any CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Seed entry {index}: {source}")]
    SeedEntry {
        index: usize,
        #[source]
        source: ProductError,
    },
}

/// Connect using `DATABASE_URL`.
async fn connect(env: &Env) -> Result<PgPool, CliError> {
    let database_url = env.database_url("DATABASE_URL")?;
    tracing::info!("Connecting to database...");
    Ok(blush_store::create_pool(&database_url).await?)
}
