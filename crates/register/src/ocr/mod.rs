//! Client for the remote menu OCR service.
//!
//! A photo of a printed menu is uploaded as `multipart/form-data`; the
//! service answers with the dishes it recognised. Candidates become
//! [`MenuItemDraft`]s under the `Scanned` category and are imported in bulk
//! by the menu service.

mod client;
mod error;
mod types;

pub use client::{OcrClient, UPLOAD_PATH};
pub use error::OcrError;
pub use types::{ScannedMenuItem, ScannedPrice};

use till_core::MenuItemDraft;
use tracing::warn;

/// Convert scanned candidates into drafts, skipping unusable ones.
#[must_use]
pub fn into_drafts(items: &[ScannedMenuItem]) -> Vec<MenuItemDraft> {
    items
        .iter()
        .filter_map(|item| match item.to_draft() {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(name = %item.name, error = %e, "Skipping scanned menu item");
                None
            }
        })
        .collect()
}
