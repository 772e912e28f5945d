//! Order viewer: orders joined against the live product list.

use std::collections::HashMap;

use serde::Serialize;

use blush_core::{Order, OrderId, OrderStatus, Product, ProductId};
use blush_store::{Store, StoreError};

use crate::error::{AppError, Result};

const LOAD_FAILED: &str = "Failed to load orders";

/// One line of the order table.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    #[serde(flatten)]
    pub order: Order,
    pub product_image: Option<String>,
    /// The referenced product no longer exists.
    pub orphaned: bool,
}

/// Join orders to products by id. Orphans are dropped unless asked for.
#[must_use]
pub fn join(orders: Vec<Order>, products: &[Product], include_orphaned: bool) -> Vec<OrderRow> {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    orders
        .into_iter()
        .filter_map(|order| {
            let product = by_id.get(&order.product_id);
            if product.is_none() && !include_orphaned {
                return None;
            }
            Some(OrderRow {
                product_image: product.and_then(|p| p.image.clone()),
                orphaned: product.is_none(),
                order,
            })
        })
        .collect()
}

pub struct OrderViewer<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderViewer<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Orders newest first, hiding those whose product was deleted.
    ///
    /// # Errors
    ///
    /// "Failed to load orders" when either collection cannot be read.
    pub async fn list(&self, include_orphaned: bool) -> Result<Vec<OrderRow>> {
        let (orders, products) = self.load().await?;
        Ok(join(orders, &products, include_orphaned))
    }

    /// Both collections, for the order table and the dashboard.
    ///
    /// # Errors
    ///
    /// "Failed to load orders" when either collection cannot be read.
    pub async fn load(&self) -> Result<(Vec<Order>, Vec<Product>)> {
        let orders = self
            .store
            .list_orders()
            .await
            .map_err(AppError::store(LOAD_FAILED))?;
        let products = self
            .store
            .list_products()
            .await
            .map_err(AppError::store(LOAD_FAILED))?;
        Ok((orders, products))
    }

    /// Move an order forward through Pending, Confirmed, Shipped, Delivered.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown order; a 409 for a backward or
    /// repeated status.
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let order = self
            .store
            .update_order_status(id, status)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::NotFound("Order not found".to_owned()),
                other => AppError::store("Failed to update order")(other),
            })?;
        tracing::info!(order_id = %id, status = %order.status, "Order status updated");
        Ok(order)
    }
}
