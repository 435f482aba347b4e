//! Integration tests for Till.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p till-integration-tests
//! ```
//!
//! Every test gets its own in-memory `SQLite` database with the schema
//! applied, so tests need no external services and run in parallel.
//!
//! # Test Categories
//!
//! - `menu` - Menu CRUD, manual entry and the menu feed
//! - `checkout` - Order entry and sale persistence
//! - `dashboard` - Revenue, order counts, payment splits and report rows

use sqlx::SqlitePool;
use till_core::{MenuItem, MenuItemDraft, Price};
use till_register::db::{self, MenuItemRepository};
use till_register::{DashboardService, MenuService, OrderEntry, RegisterError};

/// Services wired to one fresh in-memory database.
pub struct TestContext {
    pub pool: SqlitePool,
    pub menu: MenuService,
    pub dashboard: DashboardService,
}

impl TestContext {
    /// Create a fresh database and load an empty menu.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be created.
    pub async fn new() -> Result<Self, RegisterError> {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .map_err(db::RepositoryError::from)?;
        db::migrate(&pool).await?;

        Ok(Self {
            menu: MenuService::load(pool.clone()).await?,
            dashboard: DashboardService::new(pool.clone()),
            pool,
        })
    }

    /// Start an order-entry session against this database.
    #[must_use]
    pub fn order_entry(&self) -> OrderEntry {
        OrderEntry::new(self.pool.clone(), &self.menu, self.dashboard.clone())
    }

    /// Insert menu items directly, bypassing the service feed.
    ///
    /// # Errors
    ///
    /// Returns error if an insert fails.
    pub async fn seed_menu(
        &self,
        items: &[(&str, &str, &str)],
    ) -> Result<Vec<MenuItem>, RegisterError> {
        let repo = MenuItemRepository::new(&self.pool);
        let mut created = Vec::with_capacity(items.len());
        for (name, price, category) in items {
            let price = Price::parse(price).map_err(|e| RegisterError::InvalidInput(e.into()))?;
            created.push(repo.create(&MenuItemDraft::new(*name, price, *category)).await?);
        }
        self.menu.refresh().await?;
        Ok(created)
    }
}
