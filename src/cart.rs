//! Cart
//!
//! A cart is an immutable snapshot: every mutation returns a new cart and leaves the
//! original untouched, so the caller decides when to swap the current cart for the
//! new one. Totals are always derived from the lines.

use std::num::NonZeroU32;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    identifiers::{IdentifierError, ItemId},
    menu::MenuItem,
    pricing::{PricingError, Totals, line_price, total_price},
};

/// Errors raised when building or checking out a cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A quantity was zero, negative or fractional.
    #[error("invalid quantity {quantity} for item {item_id}")]
    InvalidQuantity {
        /// Item the quantity belongs to.
        item_id: String,

        /// The rejected quantity.
        quantity: Decimal,
    },

    /// A unit price was negative.
    #[error("invalid unit price {price} for item {item_id}")]
    InvalidPrice {
        /// Item the price belongs to.
        item_id: String,

        /// The rejected price.
        price: Decimal,
    },

    /// The same item appeared on more than one line.
    #[error("item {0} appears on more than one cart line")]
    DuplicateLine(ItemId),

    /// Checkout was attempted with nothing in the cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// An item identifier was not a valid store key.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// The cart's totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One item in the cart, with a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    item_id: ItemId,
    name: String,
    unit_price: Decimal,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Create a line with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPrice`] if `unit_price` is negative.
    pub fn new(
        item_id: ItemId,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, CartError> {
        if unit_price < Decimal::ZERO {
            return Err(CartError::InvalidPrice {
                item_id: item_id.to_string(),
                price: unit_price,
            });
        }

        Ok(Self {
            item_id,
            name: name.into(),
            unit_price,
            quantity: NonZeroU32::MIN,
        })
    }

    /// Set the line's quantity.
    #[must_use]
    pub fn with_quantity(self, quantity: NonZeroU32) -> Self {
        Self { quantity, ..self }
    }

    /// Identifier of the menu item.
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Item name at the time it was first added.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at the time the item was first added.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Number of units.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `unit_price × quantity`, at full precision.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product is not representable.
    pub fn line_total(&self) -> Result<Decimal, PricingError> {
        line_price(self.unit_price, self.quantity.get())
    }
}

/// Loosely typed cart line, as read from session storage or a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Item identifier.
    pub item_id: String,

    /// Item name.
    pub name: String,

    /// Unit price.
    pub unit_price: Decimal,

    /// Quantity; must be a positive whole number.
    pub quantity: Decimal,
}

impl TryFrom<CartLineRecord> for CartLine {
    type Error = CartError;

    fn try_from(record: CartLineRecord) -> Result<Self, Self::Error> {
        let quantity = parse_quantity(&record.item_id, record.quantity)?;
        let item_id: ItemId = record.item_id.parse()?;

        Ok(CartLine::new(item_id, record.name, record.unit_price)?.with_quantity(quantity))
    }
}

impl From<&CartLine> for CartLineRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: Decimal::from(line.quantity.get()),
        }
    }
}

fn parse_quantity(item_id: &str, quantity: Decimal) -> Result<NonZeroU32, CartError> {
    let invalid = || {
        warn!(item_id, %quantity, "rejected cart quantity");

        CartError::InvalidQuantity {
            item_id: item_id.to_string(),
            quantity,
        }
    };

    if !quantity.fract().is_zero() {
        return Err(invalid());
    }

    quantity
        .to_u32()
        .and_then(NonZeroU32::new)
        .ok_or_else(invalid)
}

/// An order snapshot produced at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOrder {
    /// Lines being purchased.
    pub lines: Vec<CartLine>,

    /// Totals for the lines.
    pub totals: Totals,
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateLine`] if two lines share an item identifier.
    pub fn with_lines(lines: impl Into<Vec<CartLine>>) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut seen = FxHashSet::default();

        for line in &lines {
            if !seen.insert(line.item_id()) {
                return Err(CartError::DuplicateLine(line.item_id().clone()));
            }
        }

        Ok(Self { lines })
    }

    /// Validate loosely typed records into a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any record has an invalid quantity, price or
    /// identifier, or if identifiers repeat.
    pub fn from_records(
        records: impl IntoIterator<Item = CartLineRecord>,
    ) -> Result<Self, CartError> {
        let lines = records
            .into_iter()
            .map(CartLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_lines(lines)
    }

    /// Export the cart as loosely typed records.
    pub fn to_records(&self) -> Vec<CartLineRecord> {
        self.lines.iter().map(CartLineRecord::from).collect()
    }

    /// Returns a cart with one more unit of `item`.
    ///
    /// If the item is already in the cart its quantity is incremented and its existing
    /// name and price are kept; otherwise a new line with quantity one is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidPrice`]: `item` is new and its price is negative.
    /// - [`CartError::InvalidQuantity`]: the line already holds `u32::MAX` units.
    pub fn add_item(&self, item: &MenuItem) -> Result<Self, CartError> {
        let mut lines = self.lines.clone();

        if let Some(line) = lines.iter_mut().find(|line| line.item_id == item.id) {
            line.quantity = line.quantity.checked_add(1).ok_or_else(|| {
                warn!(item_id = %item.id, "cart line is at its quantity limit");

                CartError::InvalidQuantity {
                    item_id: item.id.to_string(),
                    quantity: Decimal::from(u64::from(u32::MAX) + 1),
                }
            })?;
        } else {
            lines.push(CartLine::new(item.id.clone(), &item.name, item.price)?);
        }

        debug!(item_id = %item.id, "added item to cart");

        Ok(Self { lines })
    }

    /// Returns a cart with one fewer unit of the item `id`.
    ///
    /// A line whose quantity reaches zero is removed. Removing an item that is not in
    /// the cart returns an identical cart.
    #[must_use]
    pub fn remove_item(&self, id: &ItemId) -> Self {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                if &line.item_id != id {
                    return Some(line.clone());
                }

                NonZeroU32::new(line.quantity.get() - 1).map(|quantity| CartLine {
                    quantity,
                    ..line.clone()
                })
            })
            .collect();

        debug!(item_id = %id, "removed item from cart");

        Self { lines }
    }

    /// Calculate subtotal, tax and total from the current lines.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the amounts exceed the decimal range.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        let subtotal = total_price(
            self.lines
                .iter()
                .map(|line| (line.unit_price, line.quantity.get())),
        )?;

        Totals::from_subtotal(subtotal)
    }

    /// Submit the cart, producing an order snapshot.
    ///
    /// The caller continues with a new empty cart afterwards.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyCart`]: the cart has no lines.
    /// - [`CartError::Pricing`]: the totals overflow.
    pub fn checkout(self) -> Result<CartOrder, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let totals = self.totals()?;

        debug!(lines = self.lines.len(), total = %totals.total(), "checked out cart");

        Ok(CartOrder {
            lines: self.lines,
            totals,
        })
    }

    /// Look up the line for an item.
    pub fn line(&self, id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item_id == id)
    }

    /// Quantity of an item, or zero if it is not in the cart.
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.line(id).map_or(0, CartLine::quantity)
    }

    /// Iterate over the lines in the order items were first added.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Lines in the order items were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity.get())).sum()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn dish(id: &str, price: Decimal) -> TestResult<MenuItem> {
        Ok(MenuItem::new(id.parse()?, format!("Dish {id}"), "Daily special", price)?)
    }

    #[test]
    fn new_cart_is_empty() -> TestResult {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.totals()?.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn adding_twice_merges_into_one_line() -> TestResult {
        let b = dish("B", Decimal::from(5))?;

        let cart = Cart::new().add_item(&b)?.add_item(&b)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&b.id), 2);
        assert_eq!(cart.totals()?.subtotal(), Decimal::from(10));

        Ok(())
    }

    #[test]
    fn add_keeps_existing_name_and_price() -> TestResult {
        let original = dish("A", Decimal::from(10))?;
        let repriced = MenuItem {
            name: "Renamed".to_string(),
            price: Decimal::from(99),
            ..original.clone()
        };

        let cart = Cart::new().add_item(&original)?.add_item(&repriced)?;
        let line = cart.line(&original.id).ok_or("line missing")?;

        assert_eq!(line.unit_price(), Decimal::from(10));
        assert_eq!(line.name(), "Dish A");
        assert_eq!(line.quantity(), 2);

        Ok(())
    }

    #[test]
    fn add_does_not_mutate_the_original() -> TestResult {
        let cart = Cart::new();
        let next = cart.add_item(&dish("A", Decimal::ONE)?)?;

        assert!(cart.is_empty());
        assert_eq!(next.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_to_zero_drops_the_line() -> TestResult {
        let b = dish("B", Decimal::from(5))?;

        let cart = Cart::new().add_item(&b)?.add_item(&b)?;
        let once = cart.remove_item(&b.id);
        let twice = once.remove_item(&b.id);

        assert_eq!(once.quantity_of(&b.id), 1);
        assert!(twice.is_empty());
        assert!(twice.line(&b.id).is_none());

        Ok(())
    }

    #[test]
    fn remove_unknown_item_is_a_no_op() -> TestResult {
        let cart = Cart::new().add_item(&dish("C", Decimal::from(7))?)?;

        let after = cart.remove_item(&"Z".parse()?);

        assert_eq!(after, cart);

        Ok(())
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let cart = Cart::new()
            .add_item(&dish("x", Decimal::ONE)?)?
            .add_item(&dish("y", Decimal::ONE)?)?
            .add_item(&dish("x", Decimal::ONE)?)?;

        let ids: Vec<&str> = cart.iter().map(|line| line.item_id().as_str()).collect();

        assert_eq!(ids, ["x", "y"]);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn totals_for_two_at_ten() -> TestResult {
        let line = CartLine::new("A".parse()?, "Thali", Decimal::from(10))?
            .with_quantity(NonZeroU32::new(2).ok_or("zero")?);
        let cart = Cart::with_lines([line])?;

        let totals = cart.totals()?;

        assert_eq!(totals.subtotal(), Decimal::new(2000, 2));
        assert_eq!(totals.tax(), Decimal::new(100, 2));
        assert_eq!(totals.total(), Decimal::new(2100, 2));

        Ok(())
    }

    #[test]
    fn with_lines_rejects_duplicate_ids() -> TestResult {
        let a = CartLine::new("A".parse()?, "Thali", Decimal::ONE)?;

        let result = Cart::with_lines([a.clone(), a]);

        assert_eq!(result, Err(CartError::DuplicateLine("A".parse()?)));

        Ok(())
    }

    #[test]
    fn negative_prices_are_rejected() -> TestResult {
        let result = CartLine::new("A".parse()?, "Thali", Decimal::from(-1));

        assert!(
            matches!(result, Err(CartError::InvalidPrice { .. })),
            "expected InvalidPrice, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn free_items_are_allowed() -> TestResult {
        let line = CartLine::new("A".parse()?, "Pickle", Decimal::ZERO)?;

        assert_eq!(line.line_total()?, Decimal::ZERO);

        Ok(())
    }

    fn record(quantity: Decimal) -> CartLineRecord {
        CartLineRecord {
            item_id: "A".to_string(),
            name: "Thali".to_string(),
            unit_price: Decimal::from(10),
            quantity,
        }
    }

    #[test]
    fn records_with_whole_quantities_are_accepted() -> TestResult {
        let cart = Cart::from_records([record(Decimal::from(3))])?;

        assert_eq!(cart.quantity_of(&"A".parse()?), 3);
        assert_eq!(cart.to_records(), [record(Decimal::from(3))]);

        Ok(())
    }

    #[test]
    fn records_with_malformed_quantities_are_rejected() {
        for quantity in [Decimal::ZERO, Decimal::from(-2), Decimal::new(15, 1)] {
            let result = Cart::from_records([record(quantity)]);

            assert_eq!(
                result,
                Err(CartError::InvalidQuantity {
                    item_id: "A".to_string(),
                    quantity,
                }),
                "quantity {quantity} should be rejected"
            );
        }
    }

    #[test]
    fn records_with_unsafe_ids_are_rejected() {
        let mut bad = record(Decimal::ONE);
        bad.item_id = "a/b".to_string();

        let result = Cart::from_records([bad]);

        assert!(
            matches!(result, Err(CartError::Identifier(IdentifierError::PathSeparator(_)))),
            "expected PathSeparator, got {result:?}"
        );
    }

    #[test]
    fn checkout_returns_lines_and_totals() -> TestResult {
        let cart = Cart::new().add_item(&dish("A", Decimal::from(10))?)?;

        let order = cart.checkout()?;

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.totals.total(), Decimal::new(1050, 2));

        Ok(())
    }

    #[test]
    fn oversized_record_prices_fail_without_panicking() -> TestResult {
        let huge = CartLineRecord {
            unit_price: Decimal::MAX,
            ..record(Decimal::from(2))
        };
        let cart = Cart::from_records([huge])?;

        assert_eq!(cart.totals(), Err(PricingError::Overflow));
        assert_eq!(
            cart.checkout(),
            Err(CartError::Pricing(PricingError::Overflow))
        );

        Ok(())
    }

    #[test]
    fn adding_past_the_quantity_limit_is_rejected() -> TestResult {
        let a = dish("A", Decimal::ONE)?;
        let full = Cart::with_lines([
            CartLine::new(a.id.clone(), "Dish A", Decimal::ONE)?.with_quantity(NonZeroU32::MAX)
        ])?;

        let result = full.add_item(&a);

        assert_eq!(
            result,
            Err(CartError::InvalidQuantity {
                item_id: "A".to_string(),
                quantity: Decimal::from(4_294_967_296_u64),
            })
        );
        assert_eq!(full.quantity_of(&a.id), u32::MAX);

        Ok(())
    }

    #[test]
    fn checkout_of_empty_cart_errors() {
        assert_eq!(Cart::new().checkout(), Err(CartError::EmptyCart));
    }
}
