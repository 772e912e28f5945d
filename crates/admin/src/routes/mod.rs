//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (pings the store)
//!
//! # Auth
//! POST   /api/auth/sign-in             - Sign in (admin role only)
//! POST   /api/auth/sign-out            - Sign out
//! GET    /api/auth/me                  - Signed-in admin
//!
//! # Everything below requires an admin session
//! GET    /api/dashboard                - Headline statistics
//!
//! GET    /api/products?q=&low_stock=   - Product listing
//! POST   /api/products                 - Create product
//! PUT    /api/products/{id}            - Update product
//! DELETE /api/products/{id}            - Delete product
//! POST   /api/products/{id}/featured   - Toggle featured flag
//! GET    /api/categories               - Distinct categories
//!
//! GET    /api/orders?include_orphaned= - Orders joined to products
//! POST   /api/orders/{id}/status       - Advance order status
//!
//! GET    /api/reviews                  - Reviews, newest first
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", put(products::update).delete(products::delete))
        .route("/{id}/featured", post(products::toggle_featured))
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard", get(dashboard::stats))
        .nest("/api/products", product_routes())
        .route("/api/categories", get(products::categories))
        .route("/api/orders", get(orders::index))
        .route("/api/orders/{id}/status", post(orders::update_status))
        .route("/api/reviews", get(reviews::index))
}
