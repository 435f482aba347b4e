//! Database operations for finalized orders and their line items.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use till_core::{MenuItemId, Order, OrderId, OrderItem, PaymentMethod, PendingOrder};

use super::{RepositoryError, price_from_column, quantity_from_column, timestamp_from_column};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    created_at: i64,
    total_minor: i64,
    payment_method: PaymentMethod,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            timestamp: timestamp_from_column(row.created_at)?,
            total: price_from_column(row.total_minor, "orders.total_minor")?,
            payment_method: row.payment_method,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i64,
    menu_item_id: i32,
    quantity: i64,
    price_minor: i64,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: OrderId::new(row.order_id),
            menu_item_id: MenuItemId::new(row.menu_item_id),
            quantity: quantity_from_column(row.quantity)?,
            price: price_from_column(row.price_minor, "order_items.price_minor")?,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a checked-out cart as one order plus its line items.
    ///
    /// The order row and every line item are written in a single
    /// transaction; on error nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    #[instrument(
        skip(self, pending),
        fields(total = %pending.total, payment_method = %pending.payment_method, lines = pending.lines.len())
    )]
    pub async fn create(
        &self,
        pending: &PendingOrder,
        at: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (created_at, total_minor, payment_method)
            VALUES (?, ?, ?)
            RETURNING id, created_at, total_minor, payment_method
            ",
        )
        .bind(at.timestamp_millis())
        .bind(pending.total.to_minor_units()?)
        .bind(pending.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        for line in &pending.lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, menu_item_id, quantity, price_minor)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(row.id)
            .bind(line.menu_item_id)
            .bind(i64::from(line.quantity))
            .bind(line.unit_price.to_minor_units()?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let order = Order::try_from(row)?;
        debug!(order_id = %order.id, "Order stored");
        Ok(order)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, created_at, total_minor, payment_method FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Line items of an order, in menu item order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT order_id, menu_item_id, quantity, price_minor
            FROM order_items
            WHERE order_id = ?
            ORDER BY menu_item_id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItem::try_from).collect()
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, created_at, total_minor, payment_method
            FROM orders
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
