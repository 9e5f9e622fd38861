//! Menu item edits
//!
//! Store documents are addressed by immutable identifiers, so changing an item's
//! identifier is planned as "create the new document, then delete the old one".

use rust_decimal::Decimal;
use smallvec::smallvec;
use tracing::warn;

use crate::{
    identifiers::{CategoryId, ItemId},
    menu::{MenuCategory, MenuError, MenuItem, MenuWrites},
    store::{DocumentPath, StoreWrite},
};

/// Edited fields for an existing menu item, as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEdit {
    /// Requested identifier. Equal to the current id when it is not being changed.
    pub id: String,

    /// New display name.
    pub name: String,

    /// New description.
    pub description: String,

    /// New unit price.
    pub price: Decimal,
}

/// Validated edit and the ordered store writes that persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdatePlan {
    category: CategoryId,
    previous_id: ItemId,
    item: MenuItem,
    writes: MenuWrites,
}

impl ItemUpdatePlan {
    /// Category holding the item.
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Identifier before the edit.
    pub fn previous_id(&self) -> &ItemId {
        &self.previous_id
    }

    /// The item as it will be stored.
    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    /// Returns true if the edit changes the item's identifier.
    pub fn is_rename(&self) -> bool {
        self.previous_id != self.item.id
    }

    /// Writes to execute, in order.
    pub fn writes(&self) -> &[StoreWrite<MenuItem>] {
        &self.writes
    }
}

/// Check that an item may be renamed from `current` to `requested`.
///
/// Returns the validated identifier. Renaming an item to its own identifier is
/// allowed.
///
/// # Errors
///
/// - [`MenuError::Identifier`]: `requested` is empty or contains `/`.
/// - [`MenuError::DuplicateIdentifier`]: another item in the category already uses
///   `requested`.
pub fn check_rename(
    category: &MenuCategory,
    current: &ItemId,
    requested: &str,
) -> Result<ItemId, MenuError> {
    let requested: ItemId = requested.parse()?;

    if &requested != current && category.contains(&requested) {
        warn!(
            category = %category.name(),
            from = %current,
            to = %requested,
            "rename collides with existing item"
        );

        return Err(MenuError::DuplicateIdentifier {
            category: category.name().clone(),
            id: requested,
        });
    }

    Ok(requested)
}

pub(super) fn plan(
    category: &MenuCategory,
    current: &ItemId,
    edit: ItemEdit,
) -> Result<ItemUpdatePlan, MenuError> {
    let id = check_rename(category, current, &edit.id)?;
    let item = MenuItem::new(id, edit.name, edit.description, edit.price)?;

    let old_path = DocumentPath::menu_item(category.name(), current);

    let writes: MenuWrites = if &item.id == current {
        smallvec![StoreWrite::Update {
            path: old_path,
            document: item.clone(),
        }]
    } else {
        smallvec![
            StoreWrite::Set {
                path: DocumentPath::menu_item(category.name(), &item.id),
                document: item.clone(),
            },
            StoreWrite::Delete { path: old_path },
        ]
    };

    Ok(ItemUpdatePlan {
        category: category.name().clone(),
        previous_id: current.clone(),
        item,
        writes,
    })
}
