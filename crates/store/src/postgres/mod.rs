//! `PostgreSQL` backend.
//!
//! # Tables (schema `shop`)
//!
//! - `product` - catalog records, `status` kept in sync with `stock`
//! - `"order"` - placed orders; `product_id` is a soft reference
//! - `review` - customer reviews
//! - `user` / `user_password` - accounts and Argon2 hashes
//!
//! Session tables (`tower_sessions.session`, `admin.session`) are created by
//! the same migrations but only touched by `tower-sessions`.

mod orders;
mod products;
mod reviews;
mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use blush_core::MAX_STOCK;

use crate::{Store, StoreError};

/// Embedded migrations from `crates/store/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// [`Store`] backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns the migration error if any script fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Stock as an `INTEGER` column value.
fn stock_column(stock: u32) -> i32 {
    i32::try_from(stock.min(MAX_STOCK)).unwrap_or(i32::MAX)
}

/// Stock read back from an `INTEGER` column.
fn stock_value(column: i32) -> Result<u32, StoreError> {
    u32::try_from(column)
        .map_err(|_| StoreError::DataCorruption(format!("negative stock: {column}")))
}
