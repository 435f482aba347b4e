//! Database operations for menu items.

use sqlx::SqlitePool;
use tracing::{debug, instrument};

use till_core::{MenuItem, MenuItemDraft, MenuItemId};

use super::{RepositoryError, price_from_column};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i32,
    name: String,
    price_minor: i64,
    category: String,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = RepositoryError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MenuItemId::new(row.id),
            name: row.name,
            price: price_from_column(row.price_minor, "menu_items.price_minor")?,
            category: row.category,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for menu item database operations.
pub struct MenuItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All menu items, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, price_minor, category
            FROM menu_items
            ORDER BY name COLLATE NOCASE ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded menu items");
        rows.into_iter().map(MenuItem::try_from).collect()
    }

    /// Get a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(menu_item_id = %id))]
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            "SELECT id, name, price_minor, category FROM menu_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(MenuItem::try_from).transpose()
    }

    /// Insert a new menu item and return it with its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            INSERT INTO menu_items (name, price_minor, category)
            VALUES (?, ?, ?)
            RETURNING id, name, price_minor, category
            ",
        )
        .bind(&draft.name)
        .bind(draft.price.to_minor_units()?)
        .bind(&draft.category)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Insert several menu items in one transaction.
    ///
    /// Either every item is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    #[instrument(skip(self, drafts), fields(count = drafts.len()))]
    pub async fn create_many(
        &self,
        drafts: &[MenuItemDraft],
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let row = sqlx::query_as::<_, MenuItemRow>(
                r"
                INSERT INTO menu_items (name, price_minor, category)
                VALUES (?, ?, ?)
                RETURNING id, name, price_minor, category
                ",
            )
            .bind(&draft.name)
            .bind(draft.price.to_minor_units()?)
            .bind(&draft.category)
            .fetch_one(&mut *tx)
            .await?;
            created.push(MenuItem::try_from(row)?);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Overwrite the name, price and category of an existing item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    #[instrument(skip(self, item), fields(menu_item_id = %item.id))]
    pub async fn update(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE menu_items
            SET name = ?, price_minor = ?, category = ?
            WHERE id = ?
            ",
        )
        .bind(&item.name)
        .bind(item.price.to_minor_units()?)
        .bind(&item.category)
        .bind(item.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a menu item. Past sales of the item are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    #[instrument(skip(self), fields(menu_item_id = %id))]
    pub async fn delete(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
