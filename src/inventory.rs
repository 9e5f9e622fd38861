//! Inventory
//!
//! Kitchen stock, grouped into a fixed set of categories.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    identifiers::ItemId,
    store::{DocumentPath, StoreWrite},
};

/// Errors raised by inventory operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The stock quantity was not a non-negative whole number.
    #[error("invalid stock quantity: {0:?}")]
    InvalidQuantity(String),

    /// The category name is not one of the inventory categories.
    #[error("unknown inventory category: {0}")]
    UnknownCategory(String),

    /// The item does not exist in the category.
    #[error("inventory item {id} not found in {category}")]
    ItemNotFound {
        /// Category that was searched.
        category: InventoryCategory,

        /// Missing identifier.
        id: ItemId,
    },

    /// The item name was empty.
    #[error("inventory item name is required")]
    MissingName,
}

/// Inventory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InventoryCategory {
    /// Bread and baked goods.
    Bakery,

    /// Drinks.
    Beverages,

    /// Sauces and pickles.
    Condiments,

    /// Milk, yoghurt and paneer.
    Dairy,

    /// Frozen goods.
    Frozen,

    /// Fresh fruit.
    Fruits,

    /// Rice, flour and lentils.
    Grains,

    /// Meat and poultry.
    Meat,

    /// Whole and ground spices.
    Spices,

    /// Fresh vegetables.
    Vegetables,
}

impl InventoryCategory {
    /// Every category, in display order.
    pub const ALL: [InventoryCategory; 10] = [
        InventoryCategory::Bakery,
        InventoryCategory::Beverages,
        InventoryCategory::Condiments,
        InventoryCategory::Dairy,
        InventoryCategory::Frozen,
        InventoryCategory::Fruits,
        InventoryCategory::Grains,
        InventoryCategory::Meat,
        InventoryCategory::Spices,
        InventoryCategory::Vegetables,
    ];

    /// Stored name of the category.
    pub fn name(self) -> &'static str {
        match self {
            InventoryCategory::Bakery => "bakery",
            InventoryCategory::Beverages => "beverages",
            InventoryCategory::Condiments => "condiments",
            InventoryCategory::Dairy => "dairy",
            InventoryCategory::Frozen => "frozen",
            InventoryCategory::Fruits => "fruits",
            InventoryCategory::Grains => "grains",
            InventoryCategory::Meat => "meat",
            InventoryCategory::Spices => "spices",
            InventoryCategory::Vegetables => "vegetables",
        }
    }
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InventoryCategory {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| InventoryError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for InventoryCategory {
    type Error = InventoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InventoryCategory> for String {
    fn from(category: InventoryCategory) -> Self {
        category.name().to_string()
    }
}

/// A stocked ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Identifier, unique within the category.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Units in stock.
    pub quantity: u32,
}

/// Edited fields for an inventory item, as typed into the stock form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEdit {
    /// New name.
    pub name: String,

    /// New stock quantity, unparsed.
    pub quantity: String,
}

/// Parse a stock quantity typed by an administrator.
///
/// # Errors
///
/// Returns [`InventoryError::InvalidQuantity`] unless the trimmed input is a base-10
/// non-negative integer.
pub fn parse_stock_quantity(input: &str) -> Result<u32, InventoryError> {
    let trimmed = input.trim();

    // `u32::from_str` accepts a leading '+'
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InventoryError::InvalidQuantity(input.to_string()));
    }

    trimmed
        .parse()
        .map_err(|_err| InventoryError::InvalidQuantity(input.to_string()))
}

/// Stock across all categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    categories: BTreeMap<InventoryCategory, Vec<InventoryItem>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stocked item to a category.
    pub fn stock(&mut self, category: InventoryCategory, item: InventoryItem) {
        self.categories.entry(category).or_default().push(item);
    }

    /// Items in a category.
    pub fn items(&self, category: InventoryCategory) -> &[InventoryItem] {
        self.categories.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Non-empty categories with their items, in display order.
    pub fn categories(&self) -> impl Iterator<Item = (InventoryCategory, &[InventoryItem])> {
        self.categories
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| (*category, items.as_slice()))
    }

    fn item_mut(
        &mut self,
        category: InventoryCategory,
        id: &ItemId,
    ) -> Result<&mut InventoryItem, InventoryError> {
        self.categories
            .get_mut(&category)
            .and_then(|items| items.iter_mut().find(|item| &item.id == id))
            .ok_or_else(|| InventoryError::ItemNotFound {
                category,
                id: id.clone(),
            })
    }

    /// Apply an edit to an item, returning the write that persists it.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ItemNotFound`]: no item `id` in `category`.
    /// - [`InventoryError::MissingName`]: the new name is empty.
    /// - [`InventoryError::InvalidQuantity`]: the new quantity does not parse.
    pub fn edit(
        &mut self,
        category: InventoryCategory,
        id: &ItemId,
        edit: &InventoryEdit,
    ) -> Result<StoreWrite<InventoryItem>, InventoryError> {
        let name = edit.name.trim();

        if name.is_empty() {
            return Err(InventoryError::MissingName);
        }

        let quantity = parse_stock_quantity(&edit.quantity).inspect_err(|err| {
            warn!(%category, %id, %err, "rejected stock edit");
        })?;

        let item = self.item_mut(category, id)?;

        item.name = name.to_string();
        item.quantity = quantity;

        debug!(%category, %id, quantity, "updated stock");

        Ok(StoreWrite::Update {
            path: DocumentPath::inventory_item(category.name(), id),
            document: item.clone(),
        })
    }

    /// Remove an item, returning the write that deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::ItemNotFound`] if there is no item `id` in `category`.
    pub fn remove(
        &mut self,
        category: InventoryCategory,
        id: &ItemId,
    ) -> Result<StoreWrite<InventoryItem>, InventoryError> {
        let items = self.categories.get_mut(&category);
        let position = items
            .as_ref()
            .and_then(|items| items.iter().position(|item| &item.id == id));

        let (Some(items), Some(position)) = (items, position) else {
            return Err(InventoryError::ItemNotFound {
                category,
                id: id.clone(),
            });
        };

        items.remove(position);

        debug!(%category, %id, "removed stock item");

        Ok(StoreWrite::Delete {
            path: DocumentPath::inventory_item(category.name(), id),
        })
    }
}
