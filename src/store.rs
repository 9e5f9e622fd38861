//! Store addressing
//!
//! The collaborator document store addresses nested records as
//! `collection/{group}/items/{id}` and flat records as `collection/{id}`. This module
//! only builds paths and describes writes; executing them is the caller's job.

use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::identifiers::{CategoryId, ItemId, SubscriptionId, UserId};

/// Top-level collections in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Menu items, nested under a category.
    MenuItems,

    /// Inventory items, nested under an inventory category.
    InventoryItems,

    /// Subscription orders.
    Subscriptions,

    /// Administrator records.
    Admins,
}

impl Collection {
    /// Name of the collection in the store.
    pub fn name(self) -> &'static str {
        match self {
            Collection::MenuItems => "menuItems",
            Collection::InventoryItems => "inventoryItems",
            Collection::Subscriptions => "subscriptions",
            Collection::Admins => "admins",
        }
    }
}

/// Name of the sub-collection that holds nested items.
const ITEMS: &str = "items";

/// Path to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: Collection,
    segments: SmallVec<[String; 3]>,
}

impl DocumentPath {
    /// Path of a menu item: `menuItems/{category}/items/{id}`.
    pub fn menu_item(category: &CategoryId, id: &ItemId) -> Self {
        Self::nested(Collection::MenuItems, category.as_str(), id)
    }

    /// Path of an inventory item: `inventoryItems/{category}/items/{id}`.
    pub fn inventory_item(category: &str, id: &ItemId) -> Self {
        Self::nested(Collection::InventoryItems, category, id)
    }

    /// Path of a subscription: `subscriptions/{id}`.
    pub fn subscription(id: &SubscriptionId) -> Self {
        Self {
            collection: Collection::Subscriptions,
            segments: smallvec![id.to_string()],
        }
    }

    /// Path of an administrator record: `admins/{user_id}`.
    pub fn admin(user_id: &UserId) -> Self {
        Self {
            collection: Collection::Admins,
            segments: smallvec![user_id.to_string()],
        }
    }

    fn nested(collection: Collection, group: &str, id: &ItemId) -> Self {
        Self {
            collection,
            segments: smallvec![group.to_string(), ITEMS.to_string(), id.to_string()],
        }
    }

    /// The collection the document lives in.
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Final segment of the path (the document id).
    pub fn document_id(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection.name())?;

        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }

        Ok(())
    }
}

/// A single write against the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite<T> {
    /// Create or overwrite the document at `path`.
    Set {
        /// Target document.
        path: DocumentPath,

        /// Full document body.
        document: T,
    },

    /// Update fields of an existing document.
    Update {
        /// Target document.
        path: DocumentPath,

        /// Updated document body.
        document: T,
    },

    /// Delete the document at `path`.
    Delete {
        /// Target document.
        path: DocumentPath,
    },
}

impl<T> StoreWrite<T> {
    /// Path the write targets.
    pub fn path(&self) -> &DocumentPath {
        match self {
            StoreWrite::Set { path, .. }
            | StoreWrite::Update { path, .. }
            | StoreWrite::Delete { path } => path,
        }
    }
}

/// Ordered writes to perform for one logical change.
///
/// Writes must be executed in order; a failure part-way leaves earlier writes in
/// place and later writes unapplied.
pub type WritePlan<T> = SmallVec<[StoreWrite<T>; 2]>;
