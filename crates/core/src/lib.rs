//! Blush Core - shared domain types.
//!
//! Used by every Blush component:
//! - `store` - persistence traits with `PostgreSQL` and in-memory backends
//! - `storefront` - public catalog, ordering, reviews and customer accounts
//! - `admin` - product management, order viewer and dashboard
//! - `cli` - migrations, admin bootstrap and seeding
//!
//! # Architecture
//!
//! The core crate holds types and pure rules only: no database access and
//! no HTTP. The one exception is [`config`], which snapshots the process
//! environment once at startup. Stock status derivation, order arithmetic and form
//! coercion live here so every backend applies them the same way.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, prices, stock quantities and statuses
//! - [`config`] - environment loading and secret validation
//! - [`catalog`] - products and the search filter
//! - [`order`] - orders, customers and status transitions
//! - [`review`] - customer reviews
//! - [`user`] - user profiles and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod order;
pub mod review;
pub mod types;
pub mod user;

pub use catalog::{FormNumber, Product, ProductDraft, ProductError, ProductForm};
pub use order::{Customer, NewOrder, Order, OrderError, OrderRequest};
pub use review::{NewReview, Rating, Review, ReviewError, ReviewRequest};
pub use types::*;
pub use user::UserProfile;
