//! Order viewer handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use blush_core::{Order, OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{OrderRow, OrderViewer};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    pub include_orphaned: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// `GET /api/orders`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<OrderRow>>> {
    let rows = OrderViewer::new(state.store())
        .list(query.include_orphaned)
        .await?;
    Ok(Json(rows))
}

/// `POST /api/orders/{id}/status`
#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    tracing::info!(order_id = %id, admin_id = %admin.id, status = %update.status, "Order status change requested");
    let order = OrderViewer::new(state.store())
        .update_status(id, update.status)
        .await?;
    Ok(Json(order))
}
