//! Product management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use blush_core::{Product, ProductForm, ProductId};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::ProductManager;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
}

/// A product write plus the notification to show.
#[derive(Debug, Serialize)]
pub struct ProductSaved {
    pub message: &'static str,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `GET /api/products`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductManager::new(state.store())
        .list(query.q.as_deref(), query.low_stock)
        .await?;
    Ok(Json(products))
}

/// `POST /api/products`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<ProductSaved>)> {
    let product = ProductManager::new(state.store()).create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductSaved {
            message: "Product added successfully!",
            product,
        }),
    ))
}

/// `PUT /api/products/{id}`
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<ProductSaved>> {
    let product = ProductManager::new(state.store()).update(id, form).await?;
    Ok(Json(ProductSaved {
        message: "Product updated successfully!",
        product,
    }))
}

/// `DELETE /api/products/{id}`
///
/// The request itself is the confirmation.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Message>> {
    ProductManager::new(state.store()).delete(id).await?;
    Ok(Json(Message {
        message: "Product deleted successfully!",
    }))
}

/// `POST /api/products/{id}/featured`
#[instrument(skip_all)]
pub async fn toggle_featured(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductSaved>> {
    let product = ProductManager::new(state.store()).toggle_featured(id).await?;
    Ok(Json(ProductSaved {
        message: "Product updated!",
        product,
    }))
}

/// `GET /api/categories`
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<String>>> {
    Ok(Json(ProductManager::new(state.store()).categories().await?))
}
