//! Catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use blush_core::{Product, ProductId};

use crate::error::Result;
use crate::services::CatalogService;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `GET /api/products?q=`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.store())
        .search(query.q.as_deref())
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/featured`
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.store())
        .featured(state.config().featured_limit)
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    let product = CatalogService::new(state.store()).product(id).await?;
    Ok(Json(product))
}
