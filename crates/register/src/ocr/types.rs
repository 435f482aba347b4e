//! Types for the menu OCR service.
//!
//! The service answers an image upload with a JSON array of recognised
//! dishes. Prices arrive as JSON numbers, occasionally as strings.

use serde::{Deserialize, Serialize};
use till_core::{MenuItemDraft, MenuItemInputError, Price, SCANNED_CATEGORY};

/// A dish recognised in an uploaded menu photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedMenuItem {
    /// Dish name as read from the image.
    pub name: String,
    /// Price as read from the image.
    pub price: ScannedPrice,
    /// Category guessed by the service. Ignored on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Price field of a scanned dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScannedPrice {
    Number(f64),
    Text(String),
}

impl ScannedPrice {
    /// Convert to a [`Price`], rounding numbers to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` for negative, non-finite or unparseable values.
    pub fn to_price(&self) -> Result<Price, till_core::PriceError> {
        match self {
            Self::Number(value) => Price::from_f64_rounded(*value),
            Self::Text(text) => Price::parse(text),
        }
    }
}

impl ScannedMenuItem {
    /// Turn the scan into a draft under the `Scanned` category.
    ///
    /// # Errors
    ///
    /// Returns `MenuItemInputError` if the name is blank or the price invalid.
    pub fn to_draft(&self) -> Result<MenuItemDraft, MenuItemInputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MenuItemInputError::MissingField("name"));
        }
        Ok(MenuItemDraft::new(
            name,
            self.price.to_price()?,
            SCANNED_CATEGORY,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let json = r#"[
            {"id": 0, "name": "Veg Biryani", "price": 180.0, "category": "Rice"},
            {"name": "Masala Dosa", "price": "75.50"}
        ]"#;

        let items: Vec<ScannedMenuItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category.as_deref(), Some("Rice"));
        assert_eq!(items[1].price, ScannedPrice::Text("75.50".to_string()));
    }

    #[test]
    fn test_draft_uses_scanned_category() {
        let scanned = ScannedMenuItem {
            name: " Filter Coffee ".to_string(),
            price: ScannedPrice::Number(29.999),
            category: Some("Beverages".to_string()),
        };
        let draft = scanned.to_draft().unwrap();
        assert_eq!(draft.name, "Filter Coffee");
        assert_eq!(draft.price.to_string(), "30.00");
        assert_eq!(draft.category, SCANNED_CATEGORY);
    }

    #[test]
    fn test_invalid_candidates_are_rejected() {
        let blank = ScannedMenuItem {
            name: "  ".to_string(),
            price: ScannedPrice::Number(10.0),
            category: None,
        };
        assert!(matches!(
            blank.to_draft(),
            Err(MenuItemInputError::MissingField("name"))
        ));

        let negative = ScannedMenuItem {
            name: "Refund".to_string(),
            price: ScannedPrice::Number(-4.0),
            category: None,
        };
        assert!(matches!(
            negative.to_draft(),
            Err(MenuItemInputError::InvalidPrice(_))
        ));
    }
}
