//! Stock levels and order quantities.

use serde::{Deserialize, Serialize};

/// Products with this many units or fewer (but more than zero) are Low Stock.
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// Largest stock level a product can hold (fits an `INTEGER` column).
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

/// Read a stock level typed into a product form.
///
/// Unparseable input becomes zero, negatives are clamped to zero and huge
/// values to [`MAX_STOCK`].
#[must_use]
pub fn coerce_stock(input: &str) -> u32 {
    input
        .trim()
        .parse::<i64>()
        .map_or(0, |n| u32::try_from(n.clamp(0, i64::from(MAX_STOCK))).unwrap_or(0))
}

/// Remove `quantity` units from `stock`.
///
/// # Errors
///
/// Returns [`InsufficientStock`] when fewer than `quantity` units are left.
pub fn take_stock(stock: u32, quantity: Quantity) -> Result<u32, InsufficientStock> {
    stock
        .checked_sub(quantity.get())
        .ok_or(InsufficientStock { available: stock })
}

/// An order asked for more units than the product has.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Only {available} items available in stock")]
pub struct InsufficientStock {
    pub available: u32,
}

/// Number of units in an order line. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be at least 1")]
    Zero,
    #[error("Quantity is too large")]
    TooLarge,
}

impl Quantity {
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for zero and
    /// [`QuantityError::TooLarge`] above [`MAX_STOCK`].
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        if n == 0 {
            Err(QuantityError::Zero)
        } else if n > MAX_STOCK {
            Err(QuantityError::TooLarge)
        } else {
            Ok(Self(n))
        }
    }

    /// Like [`Quantity::new`] for signed input; negative counts as zero.
    ///
    /// # Errors
    ///
    /// See [`Quantity::new`].
    pub fn from_signed(n: i64) -> Result<Self, QuantityError> {
        match u32::try_from(n) {
            Ok(n) => Self::new(n),
            Err(_) if n < 0 => Err(QuantityError::Zero),
            Err(_) => Err(QuantityError::TooLarge),
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_stock() {
        assert_eq!(coerce_stock("25"), 25);
        assert_eq!(coerce_stock(" 7 "), 7);
        assert_eq!(coerce_stock("-3"), 0);
        assert_eq!(coerce_stock("lots"), 0);
        assert_eq!(coerce_stock(""), 0);
        assert_eq!(coerce_stock("99999999999"), MAX_STOCK);
    }

    #[test]
    fn test_take_stock_within_limit() {
        assert_eq!(take_stock(5, Quantity::new(3).unwrap()), Ok(2));
        assert_eq!(take_stock(5, Quantity::new(5).unwrap()), Ok(0));
    }

    #[test]
    fn test_take_stock_over_limit() {
        let err = take_stock(2, Quantity::new(3).unwrap()).unwrap_err();
        assert_eq!(err.available, 2);
        assert_eq!(err.to_string(), "Only 2 items available in stock");
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::from_signed(-2), Err(QuantityError::Zero));
        assert_eq!(Quantity::from_signed(i64::MAX), Err(QuantityError::TooLarge));
        assert_eq!(Quantity::from_signed(4).unwrap().get(), 4);
    }

    #[test]
    fn test_quantity_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
    }
}
