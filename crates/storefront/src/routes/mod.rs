//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness
//! GET  /health/ready             - Readiness (pings the store)
//!
//! # Catalog
//! GET  /api/products?q=          - All products, optionally filtered
//! GET  /api/products/featured    - Featured shelf
//! GET  /api/products/{id}        - Product detail
//!
//! # Orders and reviews
//! POST /api/orders               - Place an order
//! GET  /api/reviews              - Reviews, newest first
//! POST /api/reviews              - Submit a review
//!
//! # Auth (rate limited)
//! POST /api/auth/sign-up         - Create a customer account and sign in
//! POST /api/auth/sign-in         - Sign in
//! POST /api/auth/sign-out        - Sign out
//! GET  /api/auth/me              - Current user and chrome flag
//!
//! # Account (requires auth)
//! POST /api/account/profile      - Update name, email or password
//! ```

pub mod account;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Catalog routes.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Credential routes; `rate_limit` throttles sign-in and sign-up per IP.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let credentials = Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in));
    let credentials = if rate_limit {
        credentials.layer(auth_rate_limiter())
    } else {
        credentials
    };

    credentials
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .route("/api/orders", post(orders::create))
        .route("/api/reviews", get(reviews::index).post(reviews::create))
        .nest("/api/auth", auth_routes(rate_limit))
        .route("/api/account/profile", post(account::update_profile))
}
