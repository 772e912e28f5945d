//! Blush Store - document collections behind a trait seam.
//!
//! Every request handler reaches persistence through [`Store`], a bundle of
//! four collection traits:
//!
//! - [`ProductStore`] - catalog records
//! - [`OrderStore`] - placed orders (placement is a single atomic write)
//! - [`ReviewStore`] - customer reviews
//! - [`UserStore`] - accounts and password hashes
//!
//! Two backends implement them:
//!
//! - [`PgStore`] - `PostgreSQL` via `sqlx`, tables under the `shop` schema
//! - [`MemoryStore`] - process-local, for tests and local development
//!
//! [`accounts::AccountService`] sits on top of [`UserStore`] and owns the
//! password rules shared by the storefront, the admin console and the CLI.
//!
//! # Migrations
//!
//! Stored in `crates/store/migrations/` and embedded with
//! [`postgres::MIGRATOR`]:
//! ```bash
//! cargo run -p blush-cli -- migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
mod error;
pub mod memory;
pub mod postgres;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool};
pub use traits::{
    NewUser, OrderStore, PlacedOrder, ProductStore, ProfileChanges, ReviewStore, Store, UserStore,
};
