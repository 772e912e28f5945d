//! Orders and order validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    Email, EmailError, InsufficientStock, OrderId, OrderStatus, Price, PriceOverflow, ProductId,
    Quantity, QuantityError,
};

/// Who an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: String,
}

/// A stored order.
///
/// `product_id` is a soft reference: deleting the product leaves the order
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub shipping_address: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Quantity,
    /// Product price when the order was placed.
    pub unit_price: Price,
    pub delivery_fee: Price,
    pub total_amount: Price,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// `unit_price x quantity + delivery_fee`.
///
/// # Errors
///
/// Returns [`PriceOverflow`] when the total does not fit a stored amount.
pub fn order_total(
    unit_price: Price,
    quantity: Quantity,
    delivery_fee: Price,
) -> Result<Price, PriceOverflow> {
    unit_price.checked_times(quantity)?.checked_add(delivery_fee)
}

/// Order fields as submitted by a customer, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: String,
}

/// A validated order ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub customer: Customer,
    pub shipping_address: String,
    pub delivery_fee: Price,
}

/// Reasons an order is refused. Nothing is written in any of these cases.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    #[error(transparent)]
    InsufficientStock(#[from] InsufficientStock),

    #[error("Product not found")]
    ProductNotFound(ProductId),
}

impl OrderRequest {
    /// Check the customer fields and quantity.
    ///
    /// Stock is checked later, against the stored product, in the same
    /// write that records the order.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(self, delivery_fee: Price) -> Result<NewOrder, OrderError> {
        let name = required("Name", &self.customer_name)?;
        let email = Email::parse(&self.customer_email)?;
        let phone = required("Phone", &self.customer_phone)?;
        let shipping_address = required("Shipping address", &self.shipping_address)?;
        let quantity = Quantity::from_signed(self.quantity)?;

        Ok(NewOrder {
            product_id: self.product_id,
            quantity,
            customer: Customer { name, email, phone },
            shipping_address,
            delivery_fee,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, OrderError> {
    let value = value.trim();
    if value.is_empty() {
        Err(OrderError::MissingField(field))
    } else {
        Ok(value.to_owned())
    }
}

impl Order {
    /// Build the stored order for a validated request against a product
    /// snapshot taken inside the write.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] when the total is too large to store.
    pub fn placed(
        id: OrderId,
        new: NewOrder,
        product_name: String,
        unit_price: Price,
        order_date: DateTime<Utc>,
    ) -> Result<Self, PriceOverflow> {
        let total_amount = order_total(unit_price, new.quantity, new.delivery_fee)?;
        Ok(Self {
            id,
            customer_name: new.customer.name,
            customer_email: new.customer.email,
            customer_phone: new.customer.phone,
            shipping_address: new.shipping_address,
            product_id: new.product_id,
            product_name,
            quantity: new.quantity,
            unit_price,
            delivery_fee: new.delivery_fee,
            total_amount,
            order_date,
            status: OrderStatus::Pending,
        })
    }
}
