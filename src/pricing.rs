//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while preparing prices for display.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount could not be represented in minor currency units.
    #[error("amount {0} cannot be represented in minor units")]
    MinorUnits(Decimal),

    /// A line total or sum exceeded the representable range.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Number of decimal places shown for monetary values.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Sales tax applied to every order (5% GST).
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(5, 2))
}

/// Tax rate expressed in percent points, e.g. `5` for 5%.
pub fn tax_rate_points() -> Decimal {
    (tax_rate() * Decimal::ONE_HUNDRED).normalize()
}

/// Subtotal, tax and total for an order.
///
/// Amounts are kept at full precision; use [`round_for_display`] or
/// [`Totals::to_money`] when presenting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl Totals {
    /// Derive tax and total from a subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total is not representable.
    pub fn from_subtotal(subtotal: Decimal) -> Result<Self, PricingError> {
        let tax = subtotal
            .checked_mul(tax_rate() * Decimal::ONE)
            .ok_or(PricingError::Overflow)?;
        let total = subtotal.checked_add(tax).ok_or(PricingError::Overflow)?;

        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }

    /// Sum of all line totals, before tax.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Tax charged on the subtotal.
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Subtotal plus tax. There is no delivery fee.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Convert all three amounts to rounded money values.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::MinorUnits`] if an amount does not fit in minor units.
    pub fn to_money(&self, currency: &'static Currency) -> Result<MoneyTotals, PricingError> {
        Ok(MoneyTotals {
            subtotal: to_money(self.subtotal, currency)?,
            tax: to_money(self.tax, currency)?,
            total: to_money(self.total, currency)?,
        })
    }
}

/// Rounded, currency-tagged totals ready for presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyTotals {
    /// Rounded subtotal.
    pub subtotal: Money<'static, Currency>,

    /// Rounded tax.
    pub tax: Money<'static, Currency>,

    /// Rounded total.
    pub total: Money<'static, Currency>,
}

/// Price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product is not representable.
pub fn line_price(unit_price: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Calculates the total of `unit_price × quantity` over a set of lines.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if a line total or the sum is not representable.
pub fn total_price(
    lines: impl IntoIterator<Item = (Decimal, u32)>,
) -> Result<Decimal, PricingError> {
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (unit_price, quantity)| {
            acc.checked_add(line_price(unit_price, quantity)?)
                .ok_or(PricingError::Overflow)
        })
}

/// Round an amount to two decimal places, midpoint away from zero.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        DISPLAY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Convert a full-precision amount to a rounded money value.
///
/// # Errors
///
/// Returns [`PricingError::MinorUnits`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = round_for_display(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::MinorUnits(amount))?;

    Ok(Money::from_minor(minor, currency))
}
