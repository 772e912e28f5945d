//! Order placement.

use blush_core::{OrderError, OrderRequest, Price};
use blush_store::{PlacedOrder, Store, StoreError};

use crate::error::{AppError, Result};

const PLACE_FAILED: &str = "Failed to place order. Please try again.";

pub struct OrderingService<'a> {
    store: &'a dyn Store,
    delivery_fee: Price,
}

impl<'a> OrderingService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store, delivery_fee: Price) -> Self {
        Self {
            store,
            delivery_fee,
        }
    }

    /// Validate the form, then place the order in one store write.
    ///
    /// The stock check runs inside that write against the stored product,
    /// so two customers racing for the last units cannot both succeed.
    ///
    /// # Errors
    ///
    /// [`AppError::Order`] for form problems, an unknown product or too
    /// little stock; nothing is written in those cases.
    pub async fn place(&self, request: OrderRequest) -> Result<PlacedOrder> {
        let order = request.validate(self.delivery_fee)?;
        let product_id = order.product_id;

        self.store
            .place_order(order)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => OrderError::ProductNotFound(product_id).into(),
                StoreError::InsufficientStock(short) => OrderError::InsufficientStock(short).into(),
                other => AppError::store(PLACE_FAILED)(other),
            })
    }
}
