//! Menu fixtures
//!
//! YAML representation of a menu, as exported from the document store:
//!
//! ```yaml
//! categories:
//!   - name: breads
//!     items:
//!       - id: naan
//!         name: Butter Naan
//!         description: Tandoor baked flatbread
//!         price: 3.50 CAD
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::iso::{CAD, Currency, EUR, GBP, USD};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    identifiers::{CategoryId, IdentifierError, ItemId},
    menu::{Menu, MenuError, MenuItem},
};

/// Fixture parsing errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Invalid category or item identifier
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Invalid menu item or duplicate identifier
    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// Wrapper for a menu in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Categories, in display order
    pub categories: Vec<CategoryFixture>,
}

/// Category fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,

    /// Items in the category
    #[serde(default)]
    pub items: Vec<MenuItemFixture>,
}

/// Menu item fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Item identifier
    pub id: String,

    /// Item name
    pub name: String,

    /// Item description
    pub description: String,

    /// Item price (e.g., "12.50 CAD")
    pub price: String,
}

/// A menu together with the currency its prices are in.
#[derive(Debug, Clone)]
pub struct PricedMenu {
    /// The loaded menu.
    pub menu: Menu,

    /// Currency of every price on the menu, if it has any items.
    pub currency: Option<&'static Currency>,
}

impl MenuFixture {
    /// Build a menu from the fixture, checking that all prices share a currency.
    ///
    /// # Errors
    ///
    /// Returns an error if a price, identifier or item is invalid, if an identifier
    /// repeats within a category, or if currencies differ between items.
    pub fn into_menu(self) -> Result<PricedMenu, FixtureError> {
        let mut menu = Menu::new();
        let mut currency: Option<&'static Currency> = None;

        for category_fixture in self.categories {
            let category: CategoryId = category_fixture.name.parse()?;

            menu.ensure_category(category.clone());

            for item_fixture in category_fixture.items {
                let (amount, item_currency) = parse_price(&item_fixture.price)?;

                match currency {
                    Some(existing) if existing != item_currency => {
                        return Err(FixtureError::CurrencyMismatch(
                            existing.iso_alpha_code.to_string(),
                            item_currency.iso_alpha_code.to_string(),
                        ));
                    }
                    Some(_) => {}
                    None => currency = Some(item_currency),
                }

                let id: ItemId = item_fixture.id.parse()?;
                let item = MenuItem::new(id, item_fixture.name, item_fixture.description, amount)?;

                menu.add_item(&category, item)?;
            }
        }

        debug!(items = menu.len(), "loaded menu fixture");

        Ok(PricedMenu { menu, currency })
    }
}

/// Parse a menu from a YAML string.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or describes an invalid menu.
pub fn from_yaml_str(yaml: &str) -> Result<PricedMenu, FixtureError> {
    let fixture: MenuFixture = serde_norway::from_str(yaml)?;

    fixture.into_menu()
}

/// Load a menu from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or describes an invalid menu.
pub fn load(path: impl AsRef<Path>) -> Result<PricedMenu, FixtureError> {
    let contents = fs::read_to_string(path.as_ref())?;

    from_yaml_str(&contents)
}

/// Parse price string (e.g., "12.50 CAD") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the
/// amount is not a decimal number, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, find_currency(currency_code)?))
}

/// Resolve one of the supported ISO currency codes.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn find_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "CAD" => Ok(CAD),
        "USD" => Ok(USD),
        "GBP" => Ok(GBP),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const MENU: &str = r"
categories:
  - name: breads
    items:
      - id: naan
        name: Butter Naan
        description: Tandoor baked flatbread
        price: 3.50 CAD
      - id: roti
        name: Tandoori Roti
        description: Whole wheat
        price: 2.25 CAD
  - name: beverages
    items:
      - id: lassi
        name: Mango Lassi
        description: Chilled yoghurt drink
        price: 4.99 CAD
";

    #[test]
    fn loads_categories_in_order() -> TestResult {
        let priced = from_yaml_str(MENU)?;
        let names: Vec<&str> = priced
            .menu
            .categories()
            .iter()
            .map(|c| c.name().as_str())
            .collect();

        assert_eq!(names, ["breads", "beverages"]);
        assert_eq!(priced.menu.len(), 3);
        assert_eq!(priced.currency, Some(CAD));

        Ok(())
    }

    #[test]
    fn parses_item_prices_exactly() -> TestResult {
        let priced = from_yaml_str(MENU)?;
        let (_, lassi) = priced.menu.find_item(&"lassi".parse()?).ok_or("lassi missing")?;

        assert_eq!(lassi.price, Decimal::new(499, 2));

        Ok(())
    }

    #[test]
    fn rejects_mixed_currencies() {
        let yaml = r"
categories:
  - name: sides
    items:
      - { id: a, name: A, description: A, price: 1.00 CAD }
      - { id: b, name: B, description: B, price: 1.00 USD }
";

        let result = from_yaml_str(yaml);

        assert!(
            matches!(result, Err(FixtureError::CurrencyMismatch(ref a, ref b)) if a == "CAD" && b == "USD"),
            "expected CurrencyMismatch, got {result:?}"
        );
    }

    #[test]
    fn rejects_duplicate_ids_in_a_category() {
        let yaml = r"
categories:
  - name: sides
    items:
      - { id: a, name: A, description: A, price: 1.00 CAD }
      - { id: a, name: B, description: B, price: 2.00 CAD }
";

        let result = from_yaml_str(yaml);

        assert!(
            matches!(result, Err(FixtureError::Menu(MenuError::DuplicateIdentifier { .. }))),
            "expected DuplicateIdentifier, got {result:?}"
        );
    }

    #[test]
    fn empty_categories_are_kept() -> TestResult {
        let priced = from_yaml_str("categories:\n  - name: desserts\n")?;

        assert_eq!(priced.menu.categories().len(), 1);
        assert!(priced.menu.is_empty());
        assert_eq!(priced.currency, None);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99CAD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))), "got {result:?}");
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(
            matches!(result, Err(FixtureError::UnknownCurrency(ref code)) if code == "ABC"),
            "got {result:?}"
        );
    }

    #[test]
    fn parse_price_accepts_supported_currencies() -> TestResult {
        let (cad_amount, cad) = parse_price("12.50 CAD")?;
        let (usd_amount, usd) = parse_price("1.00 USD")?;

        assert_eq!(cad_amount, Decimal::new(1250, 2));
        assert_eq!(cad, CAD);
        assert_eq!(usd_amount, Decimal::ONE);
        assert_eq!(usd, USD);

        Ok(())
    }

    #[test]
    fn load_reads_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("menu.yml");
        fs::write(&path, MENU)?;

        let priced = load(&path)?;

        assert_eq!(priced.menu.len(), 3);

        Ok(())
    }
}
