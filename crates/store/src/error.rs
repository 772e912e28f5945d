use blush_core::{InsufficientStock, OrderStatus, PriceOverflow};
use thiserror::Error;

/// Errors returned by every collection operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer satisfies the domain types.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Order placement lost the race for stock, or asked for too much.
    #[error(transparent)]
    InsufficientStock(#[from] InsufficientStock),

    #[error("order status cannot change from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    PriceOverflow(#[from] PriceOverflow),
}

impl StoreError {
    /// Map a unique violation to [`StoreError::Conflict`], anything else to
    /// [`StoreError::Database`].
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }

    /// Whether the failure came from the backend rather than the request.
    #[must_use]
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Database(_) | Self::DataCorruption(_))
    }
}
