//! Menu service.
//!
//! Wraps the menu repository and republishes the full menu list after every
//! successful write so open order-entry sessions stay current. A write that
//! committed is reported as successful even if republishing fails.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use till_core::{MenuItem, MenuItemDraft, MenuItemId};

use crate::db::{MenuItemRepository, RepositoryError};
use crate::error::RegisterError;
use crate::ocr::{ScannedMenuItem, into_drafts};

use super::feed::Feed;

/// Menu management service.
///
/// Clones share the same feed.
#[derive(Clone)]
pub struct MenuService {
    pool: SqlitePool,
    feed: Arc<Feed<Vec<MenuItem>>>,
}

impl MenuService {
    /// Create a menu service with an empty feed.
    ///
    /// Call [`MenuService::refresh`] to publish the stored menu.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            feed: Arc::new(Feed::default()),
        }
    }

    /// Create a menu service and publish the stored menu.
    ///
    /// # Errors
    ///
    /// Returns error if the menu cannot be loaded.
    pub async fn load(pool: SqlitePool) -> Result<Self, RegisterError> {
        let service = Self::new(pool);
        service.refresh().await?;
        Ok(service)
    }

    /// Subscribe to the menu list, sorted by name.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<MenuItem>> {
        self.feed.subscribe()
    }

    /// Reload the menu from the database and publish it.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<MenuItem>, RegisterError> {
        let items = MenuItemRepository::new(&self.pool).list().await?;
        self.feed.publish(items.clone());
        Ok(items)
    }

    /// All menu items, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn list(&self) -> Result<Vec<MenuItem>, RegisterError> {
        Ok(MenuItemRepository::new(&self.pool).list().await?)
    }

    /// Get one menu item.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownMenuItem` if no item has this ID.
    pub async fn get(&self, id: MenuItemId) -> Result<MenuItem, RegisterError> {
        MenuItemRepository::new(&self.pool)
            .get(id)
            .await?
            .ok_or(RegisterError::UnknownMenuItem(id))
    }

    /// Store a new menu item.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, RegisterError> {
        let item = MenuItemRepository::new(&self.pool).create(draft).await?;
        info!(menu_item_id = %item.id, name = %item.name, "Menu item created");
        self.republish().await;
        Ok(item)
    }

    /// Validate manually entered fields and store the item.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::InvalidInput` for a blank field or a bad
    /// price; nothing is stored in that case.
    pub async fn create_from_input(
        &self,
        name: &str,
        price: &str,
        category: &str,
    ) -> Result<MenuItem, RegisterError> {
        let draft = MenuItemDraft::parse(name, price, category)?;
        self.create(&draft).await
    }

    /// Overwrite an existing menu item.
    ///
    /// Past sales keep the price they were sold at.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownMenuItem` if no item has this ID.
    #[instrument(skip(self, item), fields(menu_item_id = %item.id))]
    pub async fn update(&self, item: &MenuItem) -> Result<(), RegisterError> {
        MenuItemRepository::new(&self.pool)
            .update(item)
            .await
            .map_err(|e| not_found_as_unknown(e, item.id))?;
        info!(menu_item_id = %item.id, "Menu item updated");
        self.republish().await;
        Ok(())
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownMenuItem` if no item has this ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MenuItemId) -> Result<(), RegisterError> {
        MenuItemRepository::new(&self.pool)
            .delete(id)
            .await
            .map_err(|e| not_found_as_unknown(e, id))?;
        info!(menu_item_id = %id, "Menu item deleted");
        self.republish().await;
        Ok(())
    }

    /// Import OCR candidates under the `Scanned` category in one transaction.
    ///
    /// Candidates with a blank name or an unusable price are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::NothingScanned` if no candidate is usable.
    #[instrument(skip(self, scanned), fields(candidates = scanned.len()))]
    pub async fn import(&self, scanned: &[ScannedMenuItem]) -> Result<Vec<MenuItem>, RegisterError> {
        let drafts = into_drafts(scanned);
        if drafts.is_empty() {
            return Err(RegisterError::NothingScanned);
        }

        let items = MenuItemRepository::new(&self.pool)
            .create_many(&drafts)
            .await?;
        info!(count = items.len(), "Imported scanned menu items");
        self.republish().await;
        Ok(items)
    }

    async fn republish(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Failed to republish menu after write");
        }
    }
}

fn not_found_as_unknown(err: RepositoryError, id: MenuItemId) -> RegisterError {
    match err {
        RepositoryError::NotFound => RegisterError::UnknownMenuItem(id),
        other => RegisterError::Database(other),
    }
}
