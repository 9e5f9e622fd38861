//! Menu
//!
//! Menu items grouped by category, in display order. The in-memory [`Menu`] mirrors
//! what the collaborator store holds; every mutating operation also returns the store
//! writes that persist it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    identifiers::{CategoryId, IdentifierError, ItemId},
    store::{DocumentPath, StoreWrite, WritePlan},
};

pub mod edits;
pub mod fixtures;

pub use edits::{ItemEdit, ItemUpdatePlan, check_rename};

/// Display order for the standard kitchen categories.
pub const CATEGORY_ORDER: [&str; 8] = [
    "appetizers",
    "snacks",
    "vegetarian main course",
    "non vegetarian main course",
    "breads",
    "rices",
    "sides",
    "beverages",
];

/// Errors raised by menu operations.
#[derive(Debug, Error, PartialEq)]
pub enum MenuError {
    /// An item with this identifier already exists in the category.
    #[error("item {id} already exists in category {category}")]
    DuplicateIdentifier {
        /// Category that was checked.
        category: CategoryId,

        /// Colliding identifier.
        id: ItemId,
    },

    /// The category does not exist.
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    /// The item does not exist in the category.
    #[error("item {id} not found in category {category}")]
    ItemNotFound {
        /// Category that was searched.
        category: CategoryId,

        /// Missing identifier.
        id: ItemId,
    },

    /// A required field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The price was zero or negative.
    #[error("price must be greater than zero, got {0}")]
    InvalidPrice(Decimal),

    /// The identifier is not a valid store key.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

/// A dish offered on the menu.
///
/// Deserializing runs the same checks as [`MenuItem::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MenuItemFields")]
pub struct MenuItem {
    /// Identifier, unique within the category.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Short description.
    pub description: String,

    /// Unit price in major currency units.
    pub price: Decimal,
}

impl MenuItem {
    /// Create a menu item, validating its fields.
    ///
    /// # Errors
    ///
    /// - [`MenuError::MissingField`]: name or description is empty.
    /// - [`MenuError::InvalidPrice`]: price is zero or negative.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, MenuError> {
        let item = Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        };

        item.validate()?;

        Ok(item)
    }

    fn validate(&self) -> Result<(), MenuError> {
        if self.name.trim().is_empty() {
            return Err(MenuError::MissingField("name"));
        }

        if self.description.trim().is_empty() {
            return Err(MenuError::MissingField("description"));
        }

        if self.price <= Decimal::ZERO {
            return Err(MenuError::InvalidPrice(self.price));
        }

        Ok(())
    }
}

/// Unchecked menu item document.
#[derive(Debug, Deserialize)]
struct MenuItemFields {
    id: ItemId,
    name: String,
    description: String,
    price: Decimal,
}

impl TryFrom<MenuItemFields> for MenuItem {
    type Error = MenuError;

    fn try_from(fields: MenuItemFields) -> Result<Self, Self::Error> {
        MenuItem::new(fields.id, fields.name, fields.description, fields.price)
    }
}

/// A named group of menu items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCategory {
    name: CategoryId,
    items: Vec<MenuItem>,
}

impl MenuCategory {
    /// Create an empty category.
    pub fn new(name: CategoryId) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    /// Category name.
    pub fn name(&self) -> &CategoryId {
        &self.name
    }

    /// Items in the category, in insertion order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look up an item by identifier.
    pub fn item(&self, id: &ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Returns true if an item with this identifier exists.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }
}

/// The full menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category if it is not already present.
    pub fn ensure_category(&mut self, name: CategoryId) {
        if self.category(&name).is_none() {
            self.categories.push(MenuCategory::new(name));
        }
    }

    /// Categories in the order they were added.
    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// Categories sorted by [`CATEGORY_ORDER`], with unknown categories last.
    pub fn categories_in_display_order(&self) -> Vec<&MenuCategory> {
        let mut categories: Vec<&MenuCategory> = self.categories.iter().collect();

        categories.sort_by_key(|category| {
            CATEGORY_ORDER
                .iter()
                .position(|name| *name == category.name.as_str())
                .unwrap_or(CATEGORY_ORDER.len())
        });

        categories
    }

    /// Look up a category by name.
    pub fn category(&self, name: &CategoryId) -> Option<&MenuCategory> {
        self.categories.iter().find(|c| &c.name == name)
    }

    fn category_mut(&mut self, name: &CategoryId) -> Result<&mut MenuCategory, MenuError> {
        self.categories
            .iter_mut()
            .find(|c| &c.name == name)
            .ok_or_else(|| MenuError::CategoryNotFound(name.clone()))
    }

    /// Find the first item with this identifier in any category.
    pub fn find_item(&self, id: &ItemId) -> Option<(&CategoryId, &MenuItem)> {
        self.categories
            .iter()
            .find_map(|category| category.item(id).map(|item| (&category.name, item)))
    }

    /// Total number of items across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Returns true if the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a new item to a category, creating the category if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::DuplicateIdentifier`] if the category already has an item
    /// with the same identifier.
    pub fn add_item(
        &mut self,
        category: &CategoryId,
        item: MenuItem,
    ) -> Result<StoreWrite<MenuItem>, MenuError> {
        item.validate()?;

        self.ensure_category(category.clone());
        let group = self.category_mut(category)?;

        if group.contains(&item.id) {
            warn!(%category, id = %item.id, "rejected duplicate menu item");

            return Err(MenuError::DuplicateIdentifier {
                category: category.clone(),
                id: item.id,
            });
        }

        debug!(%category, id = %item.id, "added menu item");

        let write = StoreWrite::Set {
            path: DocumentPath::menu_item(category, &item.id),
            document: item.clone(),
        };

        group.items.push(item);

        Ok(write)
    }

    /// Remove an item from a category.
    ///
    /// # Errors
    ///
    /// - [`MenuError::CategoryNotFound`]: the category does not exist.
    /// - [`MenuError::ItemNotFound`]: the item does not exist in the category.
    pub fn remove_item(
        &mut self,
        category: &CategoryId,
        id: &ItemId,
    ) -> Result<StoreWrite<MenuItem>, MenuError> {
        let group = self.category_mut(category)?;

        let idx = group
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| MenuError::ItemNotFound {
                category: category.clone(),
                id: id.clone(),
            })?;

        group.items.remove(idx);

        debug!(%category, %id, "removed menu item");

        Ok(StoreWrite::Delete {
            path: DocumentPath::menu_item(category, id),
        })
    }

    /// Validate an edit and plan the store writes needed to persist it.
    ///
    /// See [`ItemUpdatePlan`] for the write ordering on identifier changes.
    ///
    /// # Errors
    ///
    /// - [`MenuError::CategoryNotFound`] / [`MenuError::ItemNotFound`]: the edited
    ///   item does not exist.
    /// - [`MenuError::MissingField`] / [`MenuError::InvalidPrice`]: invalid fields.
    /// - [`MenuError::DuplicateIdentifier`]: the new identifier is already taken.
    pub fn plan_update(
        &self,
        category: &CategoryId,
        id: &ItemId,
        edit: ItemEdit,
    ) -> Result<ItemUpdatePlan, MenuError> {
        let group = self
            .category(category)
            .ok_or_else(|| MenuError::CategoryNotFound(category.clone()))?;

        if !group.contains(id) {
            return Err(MenuError::ItemNotFound {
                category: category.clone(),
                id: id.clone(),
            });
        }

        edits::plan(group, id, edit)
    }

    /// Reflect a persisted update plan in the in-memory menu.
    ///
    /// # Errors
    ///
    /// - [`MenuError::CategoryNotFound`] / [`MenuError::ItemNotFound`]: the plan's
    ///   original item is no longer present.
    pub fn apply_update(&mut self, plan: &ItemUpdatePlan) -> Result<(), MenuError> {
        let group = self.category_mut(plan.category())?;

        let slot = group
            .items
            .iter_mut()
            .find(|item| &item.id == plan.previous_id())
            .ok_or_else(|| MenuError::ItemNotFound {
                category: plan.category().clone(),
                id: plan.previous_id().clone(),
            })?;

        *slot = plan.item().clone();

        debug!(
            category = %plan.category(),
            from = %plan.previous_id(),
            to = %plan.item().id,
            "applied menu item update"
        );

        Ok(())
    }
}

/// Writes produced by a menu change.
pub type MenuWrites = WritePlan<MenuItem>;

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, price: i64) -> TestResult<MenuItem> {
        Ok(MenuItem::new(
            id.parse()?,
            format!("Dish {id}"),
            "House special",
            Decimal::from(price),
        )?)
    }

    #[test]
    fn add_item_returns_set_write() -> TestResult {
        let mut menu = Menu::new();
        let breads: CategoryId = "breads".parse()?;

        let write = menu.add_item(&breads, item("naan", 3)?)?;

        assert_eq!(write.path().to_string(), "menuItems/breads/items/naan");
        assert!(matches!(write, StoreWrite::Set { .. }), "expected a Set write");
        assert_eq!(menu.len(), 1);

        Ok(())
    }

    #[test]
    fn add_item_rejects_duplicates_within_category() -> TestResult {
        let mut menu = Menu::new();
        let breads: CategoryId = "breads".parse()?;

        menu.add_item(&breads, item("naan", 3)?)?;
        let result = menu.add_item(&breads, item("naan", 4)?);

        assert_eq!(
            result,
            Err(MenuError::DuplicateIdentifier {
                category: breads,
                id: "naan".parse()?,
            })
        );
        assert_eq!(menu.len(), 1);

        Ok(())
    }

    #[test]
    fn same_id_in_different_categories_is_allowed() -> TestResult {
        let mut menu = Menu::new();

        menu.add_item(&"breads".parse()?, item("1", 3)?)?;
        menu.add_item(&"sides".parse()?, item("1", 2)?)?;

        assert_eq!(menu.len(), 2);
        assert_eq!(menu.categories().len(), 2);

        Ok(())
    }

    #[test]
    fn new_item_validates_fields() -> TestResult {
        let id: ItemId = "x".parse()?;

        assert_eq!(
            MenuItem::new(id.clone(), "", "desc", Decimal::ONE),
            Err(MenuError::MissingField("name"))
        );
        assert_eq!(
            MenuItem::new(id.clone(), "Name", " ", Decimal::ONE),
            Err(MenuError::MissingField("description"))
        );
        assert_eq!(
            MenuItem::new(id, "Name", "desc", Decimal::ZERO),
            Err(MenuError::InvalidPrice(Decimal::ZERO))
        );

        Ok(())
    }

    #[test]
    fn remove_item_returns_delete_write() -> TestResult {
        let mut menu = Menu::new();
        let sides: CategoryId = "sides".parse()?;
        let raita: ItemId = "raita".parse()?;

        menu.add_item(&sides, item("raita", 2)?)?;
        let write = menu.remove_item(&sides, &raita)?;

        assert_eq!(
            write,
            StoreWrite::Delete {
                path: DocumentPath::menu_item(&sides, &raita)
            }
        );
        assert!(menu.is_empty());

        Ok(())
    }

    #[test]
    fn remove_missing_item_errors() -> TestResult {
        let mut menu = Menu::new();
        let sides: CategoryId = "sides".parse()?;
        menu.ensure_category(sides.clone());

        let result = menu.remove_item(&sides, &"ghost".parse()?);

        assert!(
            matches!(result, Err(MenuError::ItemNotFound { .. })),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn display_order_follows_kitchen_layout() -> TestResult {
        let mut menu = Menu::new();

        menu.ensure_category("beverages".parse()?);
        menu.ensure_category("desserts".parse()?);
        menu.ensure_category("appetizers".parse()?);
        menu.ensure_category("breads".parse()?);

        let names: Vec<&str> = menu
            .categories_in_display_order()
            .into_iter()
            .map(|c| c.name().as_str())
            .collect();

        assert_eq!(names, ["appetizers", "breads", "beverages", "desserts"]);

        Ok(())
    }

    #[test]
    fn find_item_searches_all_categories() -> TestResult {
        let mut menu = Menu::new();

        menu.add_item(&"breads".parse()?, item("naan", 3)?)?;
        menu.add_item(&"beverages".parse()?, item("lassi", 4)?)?;

        let (category, found) = menu.find_item(&"lassi".parse()?).ok_or("lassi missing")?;

        assert_eq!(category.as_str(), "beverages");
        assert_eq!(found.price, Decimal::from(4));

        Ok(())
    }

    #[test]
    fn stored_items_are_checked_when_read() -> TestResult {
        let valid: MenuItem = serde_norway::from_str(
            "id: naan\nname: Butter Naan\ndescription: Tandoor bread\nprice: 3.5\n",
        )?;

        assert_eq!(valid.price, Decimal::new(35, 1));

        let free = serde_norway::from_str::<MenuItem>(
            "id: naan\nname: Butter Naan\ndescription: Tandoor bread\nprice: 0\n",
        );
        let unnamed = serde_norway::from_str::<MenuItem>(
            "id: naan\nname: '  '\ndescription: Tandoor bread\nprice: 3\n",
        );

        let free = free.err().ok_or("zero price should not deserialize")?;
        let unnamed = unnamed.err().ok_or("blank name should not deserialize")?;

        assert!(free.to_string().contains("price must be greater than zero"), "{free}");
        assert!(unnamed.to_string().contains("name is required"), "{unnamed}");

        Ok(())
    }
}
