//! Database migrations.
//!
//! Applies the migrations embedded in `blush-store`: the `shop` schema and
//! both session tables.

use blush_core::config::Env;
use blush_store::PgStore;

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Fails when `DATABASE_URL` is unset, the database is unreachable or a
/// migration fails.
pub async fn run() -> Result<(), CliError> {
    let store = PgStore::new(connect(&Env::load()).await?);

    tracing::info!("Running migrations...");
    store.migrate().await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
