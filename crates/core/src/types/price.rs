//! Money amounts.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::stock::Quantity;

/// A non-negative amount in the store currency (USD).
///
/// Serializes as a decimal string (`"10.00"`) so no precision is lost in
/// JSON. Negative amounts cannot be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

/// Returned when a negative amount is turned into a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("price cannot be negative: {0}")]
pub struct NegativePrice(pub Decimal);

/// Returned when a computed amount would exceed [`Price::MAX`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Order total is too large")]
pub struct PriceOverflow;

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a `NUMERIC(12, 2)` column holds: 9,999,999,999.99.
    pub const MAX: Self = Self(Decimal::from_parts(3_567_587_327, 232, 0, false, 2));

    /// # Errors
    ///
    /// Returns [`NegativePrice`] when `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, NegativePrice> {
        if amount.is_sign_negative() && !amount.is_zero() {
            Err(NegativePrice(amount))
        } else {
            Ok(Self(amount))
        }
    }

    /// Read a price typed into a product form.
    ///
    /// Unparseable input becomes zero, negative input is clamped to zero and
    /// oversize input to [`Price::MAX`], so a bad form never fails to save.
    /// Amounts are rounded to cents, half away from zero.
    #[must_use]
    pub fn coerce(input: &str) -> Self {
        input
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .ok()
            .and_then(|amount| Self::new(amount).ok())
            .map_or(Self::ZERO, Self::to_cents)
    }

    fn to_cents(self) -> Self {
        if self.0 >= Self::MAX.0 {
            return Self::MAX;
        }
        let mut cents = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        cents.rescale(2);
        Self(cents)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] when the result exceeds [`Price::MAX`].
    pub fn checked_times(self, quantity: Quantity) -> Result<Self, PriceOverflow> {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .map_or(Err(PriceOverflow), Self::bounded)
    }

    /// # Errors
    ///
    /// Returns [`PriceOverflow`] when the result exceeds [`Price::MAX`].
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceOverflow> {
        self.0
            .checked_add(rhs.0)
            .map_or(Err(PriceOverflow), Self::bounded)
    }

    fn bounded(amount: Decimal) -> Result<Self, PriceOverflow> {
        if amount > Self::MAX.0 {
            Err(PriceOverflow)
        } else {
            Ok(Self(amount))
        }
    }

    /// Formatted for display, e.g. `$30.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

/// Reporting totals. Saturates rather than overflowing, and may exceed
/// [`Price::MAX`] since the result is never stored.
impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.0)))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = NegativePrice;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
