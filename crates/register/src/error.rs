//! Unified error handling for the register.

use thiserror::Error;
use till_core::{CheckoutError, MenuItemId, MenuItemInputError};

use crate::db::RepositoryError;
use crate::ocr::OcrError;

/// Application-level error type for register services.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// OCR service call failed.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Checkout preconditions were not met.
    #[error("Cannot check out: {0}")]
    Checkout(#[from] CheckoutError),

    /// Manually entered menu data was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] MenuItemInputError),

    /// No menu item has this ID.
    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(MenuItemId),

    /// The OCR service recognised nothing usable.
    #[error("No menu items found in the image")]
    NothingScanned,
}

impl RegisterError {
    /// Whether the user can fix this by changing input, retrying the remote
    /// call or adjusting the order.
    ///
    /// Storage failures are not recoverable from the register.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}
