//! Menu item records and manual-entry validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::MenuItemId;
use super::price::{Price, PriceError};

/// Category given to items created without one.
pub const DEFAULT_CATEGORY: &str = "Default";

/// Category given to items imported from a scanned menu.
pub const SCANNED_CATEGORY: &str = "Scanned";

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique menu item ID.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Current selling price.
    pub price: Price,
    /// Category used to group the menu for display.
    pub category: String,
}

/// Errors from validating manually entered menu item fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuItemInputError {
    /// A required field was left blank.
    #[error("please fill out the {0} field")]
    MissingField(&'static str),

    /// The price could not be parsed.
    #[error("please enter a valid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// Fields for a menu item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    /// Display name.
    pub name: String,
    /// Selling price.
    pub price: Price,
    /// Category used to group the menu for display.
    pub category: String,
}

impl MenuItemDraft {
    /// Create a draft, substituting [`DEFAULT_CATEGORY`] for a blank category.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price, category: impl Into<String>) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY.to_owned()
        } else {
            category.trim().to_owned()
        };
        Self {
            name: name.into().trim().to_owned(),
            price,
            category,
        }
    }

    /// Validate raw text fields as typed into an entry form.
    ///
    /// All three fields are required and trimmed; the price must be a
    /// non-negative decimal with at most two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns `MenuItemInputError` describing the first problem found.
    pub fn parse(name: &str, price: &str, category: &str) -> Result<Self, MenuItemInputError> {
        let name = name.trim();
        let category = category.trim();
        if name.is_empty() {
            return Err(MenuItemInputError::MissingField("name"));
        }
        if price.trim().is_empty() {
            return Err(MenuItemInputError::MissingField("price"));
        }
        if category.is_empty() {
            return Err(MenuItemInputError::MissingField("category"));
        }
        let price = Price::parse(price)?;
        Ok(Self::new(name, price, category))
    }

    /// Attach a stored identity.
    #[must_use]
    pub fn into_item(self, id: MenuItemId) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
        }
    }
}

impl From<MenuItem> for MenuItemDraft {
    fn from(item: MenuItem) -> Self {
        Self {
            name: item.name,
            price: item.price,
            category: item.category,
        }
    }
}
