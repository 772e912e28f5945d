//! Core value types.
//!
//! Type-safe wrappers for the domain concepts shared by products, orders,
//! reviews and users.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod stock;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{NegativePrice, Price, PriceOverflow};
pub use status::*;
pub use stock::{
    InsufficientStock, LOW_STOCK_THRESHOLD, MAX_STOCK, Quantity, QuantityError, coerce_stock,
    take_stock,
};
