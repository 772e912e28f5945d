//! Order placement handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use blush_core::{Order, OrderRequest, Product};

use crate::error::{Result, add_breadcrumb};
use crate::services::OrderingService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub message: &'static str,
    pub order: Order,
    /// The product with its new stock level and status.
    pub product: Product,
}

/// `POST /api/orders`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderPlaced>)> {
    let placed = OrderingService::new(state.store(), state.config().delivery_fee)
        .place(request)
        .await?;

    tracing::info!(
        order_id = %placed.order.id,
        product_id = %placed.product.id,
        quantity = placed.order.quantity.get(),
        total = %placed.order.total_amount,
        "Order placed"
    );
    add_breadcrumb(
        "order",
        "Placed order",
        &[
            ("order_id", placed.order.id.to_string()),
            ("product_id", placed.product.id.to_string()),
        ],
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderPlaced {
            message: "Order placed successfully!",
            order: placed.order,
            product: placed.product,
        }),
    ))
}
