//! Identifiers
//!
//! Document keys used to address menu items, inventory items and categories in the
//! collaborator store. Keys become path segments, so they must be non-empty and must
//! not contain a path separator.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path separator used by the collaborator store.
pub const PATH_SEPARATOR: char = '/';

/// Errors raised when a string cannot be used as a store key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The key was empty or only whitespace.
    #[error("identifier must not be empty")]
    Empty,

    /// The key contained the store's path separator.
    #[error("identifier {0:?} must not contain '/'")]
    PathSeparator(String),
}

/// Validate that `key` can be used as a single path segment.
///
/// # Errors
///
/// - [`IdentifierError::Empty`]: the key is empty or whitespace.
/// - [`IdentifierError::PathSeparator`]: the key contains `/`.
pub fn validate_store_key(key: &str) -> Result<(), IdentifierError> {
    if key.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }

    if key.contains(PATH_SEPARATOR) {
        return Err(IdentifierError::PathSeparator(key.to_string()));
    }

    Ok(())
}

macro_rules! store_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new key, validating that it is store-safe.
            ///
            /// # Errors
            ///
            /// Returns an [`IdentifierError`] if the key is empty or contains `/`.
            pub fn new(key: impl Into<String>) -> Result<Self, IdentifierError> {
                let key = key.into();

                validate_store_key(&key)?;

                Ok(Self(key))
            }

            /// Returns the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

store_key! {
    /// Identifier of a menu or inventory item, unique within its category.
    ItemId
}

store_key! {
    /// Name of a menu category (e.g. `vegetarian main course`).
    CategoryId
}

store_key! {
    /// Identifier of an authenticated user, as issued by the identity provider.
    UserId
}

store_key! {
    /// Document identifier of a stored subscription.
    SubscriptionId
}
