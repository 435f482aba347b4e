//! The open order-entry session.
//!
//! An [`OrderEntry`] owns the cart for the sale being rung up, follows the
//! menu feed for search and display, and is the only place a cart crosses
//! into storage. It is driven by a single task through `&mut self`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use till_core::{Cart, MenuEntry, MenuItem, MenuItemId, Order, PaymentMethod, group_menu};

use crate::db::OrderRepository;
use crate::error::RegisterError;

use super::dashboard::DashboardService;
use super::menu::MenuService;

/// One order-entry session.
pub struct OrderEntry {
    pool: SqlitePool,
    menu: watch::Receiver<Vec<MenuItem>>,
    dashboard: DashboardService,
    cart: Cart,
    query: String,
}

impl OrderEntry {
    /// Start a session with an empty cart, cash selected and no search query.
    #[must_use]
    pub fn new(pool: SqlitePool, menu: &MenuService, dashboard: DashboardService) -> Self {
        Self {
            pool,
            menu: menu.subscribe(),
            dashboard,
            cart: Cart::new(),
            query: String::new(),
        }
    }

    /// The cart being built.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query. Surrounding whitespace is ignored.
    pub fn set_query(&mut self, query: &str) {
        query.trim().clone_into(&mut self.query);
    }

    /// The latest menu, grouped by category and filtered by the query.
    #[must_use]
    pub fn menu_display(&self) -> Vec<MenuEntry> {
        group_menu(&self.menu.borrow(), &self.query)
    }

    /// Add one unit of a menu item, looked up in the latest menu.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownMenuItem` if the item is not on the menu.
    pub fn add(&mut self, id: MenuItemId) -> Result<u32, RegisterError> {
        self.add_many(id, 1)
    }

    /// Add `quantity` units of a menu item in one step.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownMenuItem` if the item is not on the menu.
    pub fn add_many(&mut self, id: MenuItemId, quantity: u32) -> Result<u32, RegisterError> {
        let item = self
            .menu
            .borrow()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(RegisterError::UnknownMenuItem(id))?;
        Ok(self.cart.add_many(&item, quantity))
    }

    /// Add one more unit of an item already in the cart.
    pub fn increment(&mut self, id: MenuItemId) -> Option<u32> {
        self.cart.increment(id)
    }

    /// Remove one unit; the line disappears at zero. No-op if absent.
    pub fn decrement(&mut self, id: MenuItemId) -> Option<u32> {
        self.cart.decrement(id)
    }

    /// Select how the sale will be paid.
    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.cart.set_payment_method(method);
    }

    /// Deselect the payment method.
    pub const fn clear_payment_method(&mut self) {
        self.cart.clear_payment_method();
    }

    /// Finalize the sale now.
    ///
    /// # Errors
    ///
    /// See [`OrderEntry::checkout_at`].
    pub async fn checkout(&mut self) -> Result<Order, RegisterError> {
        self.checkout_at(Utc::now()).await
    }

    /// Finalize the sale with the given timestamp.
    ///
    /// The order and its lines are stored in one transaction, the cart is
    /// emptied and the dashboard is republished. If storing fails the cart
    /// is left as it was so the sale can be retried.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::Checkout` if the cart is empty or no payment
    /// method is selected, and `RegisterError::Database` if storing fails.
    #[instrument(skip(self), fields(lines = self.cart.lines().len(), total = %self.cart.total()))]
    pub async fn checkout_at(&mut self, at: DateTime<Utc>) -> Result<Order, RegisterError> {
        let pending = self.cart.pending_order()?;
        let order = OrderRepository::new(&self.pool).create(&pending, at).await?;
        self.cart.clear();

        info!(
            order_id = %order.id,
            total = %order.total,
            payment_method = %order.payment_method,
            "Sale finalized"
        );

        if let Err(e) = self.dashboard.refresh().await {
            warn!(error = %e, "Failed to refresh dashboard after sale");
        }

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use till_core::CheckoutError;

    use super::*;
    use crate::db::{create_pool, migrate};

    async fn session() -> (OrderEntry, MenuService) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrate(&pool).await.unwrap();
        let menu = MenuService::load(pool.clone()).await.unwrap();
        menu.create_from_input("Tea", "15", "Drinks").await.unwrap();
        menu.create_from_input("Coffee", "40", "Drinks").await.unwrap();
        menu.create_from_input("Cake", "85.50", "Bakery").await.unwrap();
        let entry = OrderEntry::new(pool.clone(), &menu, DashboardService::new(pool));
        (entry, menu)
    }

    fn id_of(entry: &OrderEntry, name: &str) -> MenuItemId {
        entry
            .menu
            .borrow()
            .iter()
            .find(|i| i.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_menu_display_follows_query_and_feed() {
        let (mut entry, menu) = session().await;
        assert_eq!(entry.menu_display().len(), 5);

        entry.set_query(" cof ");
        assert_eq!(entry.query(), "cof");
        assert_eq!(entry.menu_display().len(), 2);

        menu.create_from_input("Cold Coffee", "60", "Drinks").await.unwrap();
        assert_eq!(entry.menu_display().len(), 3);
    }

    #[tokio::test]
    async fn test_add_unknown_item() {
        let (mut entry, _menu) = session().await;
        assert!(matches!(
            entry.add(MenuItemId::new(999)),
            Err(RegisterError::UnknownMenuItem(_))
        ));
        assert!(entry.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_many_takes_one_step_for_any_quantity() {
        let (mut entry, _menu) = session().await;
        let tea = id_of(&entry, "Tea");
        assert_eq!(entry.add_many(tea, 4_000_000_000).unwrap(), 4_000_000_000);
        assert_eq!(entry.cart().lines().len(), 1);
        assert_eq!(entry.cart().total().to_string(), "60000000000.00");
        assert!(matches!(
            entry.add_many(MenuItemId::new(999), 2),
            Err(RegisterError::UnknownMenuItem(_))
        ));
    }

    #[tokio::test]
    async fn test_checkout_preconditions_leave_cart_unchanged() {
        let (mut entry, _menu) = session().await;
        assert!(matches!(
            entry.checkout().await,
            Err(RegisterError::Checkout(CheckoutError::EmptyCart))
        ));

        let tea = id_of(&entry, "Tea");
        entry.add(tea).unwrap();
        entry.clear_payment_method();
        let before = entry.cart().clone();

        let err = entry.checkout().await.unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Checkout(CheckoutError::NoPaymentMethod)
        ));
        assert!(err.is_recoverable());
        assert_eq!(entry.cart(), &before);
    }

    #[tokio::test]
    async fn test_checkout_stores_order_and_resets_cart() {
        let (mut entry, _menu) = session().await;
        let tea = id_of(&entry, "Tea");
        let cake = id_of(&entry, "Cake");
        entry.add(tea).unwrap();
        entry.increment(tea).unwrap();
        entry.add(cake).unwrap();
        entry.set_payment_method(PaymentMethod::Upi);

        let order = entry.checkout().await.unwrap();
        assert_eq!(order.total.to_string(), "115.50");
        assert_eq!(order.payment_method, PaymentMethod::Upi);
        assert!(entry.cart().is_empty());
        assert!(entry.cart().total().is_zero());

        let items = OrderRepository::new(&entry.pool).items(order.id).await.unwrap();
        assert_eq!(items.len(), 2);

        let summary = entry.dashboard.subscribe().borrow().clone();
        assert_eq!(summary.today_order_count, 1);
    }
}
