//! Aggregate queries backing the dashboard and the sales report.
//!
//! Windows are passed in as [`ReportWindow`]s, already converted to UTC.
//! Grouping by calendar date needs the local UTC offset, which callers pass
//! in seconds (see [`SalesRepository::daily_sales`]).

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::instrument;

use till_core::{
    DailySales, OrderId, PaymentMethod, PaymentMethodTotal, Price, ReportWindow, SalesReportRow,
};

use super::{RepositoryError, price_from_column, quantity_from_column, timestamp_from_column};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DailySalesRow {
    day: String,
    total_minor: i64,
}

impl TryFrom<DailySalesRow> for DailySales {
    type Error = RepositoryError;

    fn try_from(row: DailySalesRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d")
            .map_err(|e| RepositoryError::DataCorruption(format!("day = {}: {e}", row.day)))?;
        Ok(Self {
            date,
            total: price_from_column(row.total_minor, "SUM(total_minor)")?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentTotalRow {
    payment_method: PaymentMethod,
    total_minor: i64,
}

impl TryFrom<PaymentTotalRow> for PaymentMethodTotal {
    type Error = RepositoryError;

    fn try_from(row: PaymentTotalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_method: row.payment_method,
            total: price_from_column(row.total_minor, "SUM(total_minor)")?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    order_id: i64,
    created_at: i64,
    payment_method: PaymentMethod,
    item_name: String,
    quantity: i64,
    price_minor: i64,
}

impl TryFrom<ReportRow> for SalesReportRow {
    type Error = RepositoryError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: OrderId::new(row.order_id),
            timestamp: timestamp_from_column(row.created_at)?,
            payment_method: row.payment_method,
            item_name: row.item_name,
            quantity: quantity_from_column(row.quantity)?,
            price_per_item: price_from_column(row.price_minor, "order_items.price_minor")?,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only sales aggregates.
pub struct SalesRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SalesRepository<'a> {
    /// Create a new sales repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Sum of order totals inside `window`. Zero when there are no orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn revenue_between(&self, window: ReportWindow) -> Result<Price, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(total_minor), 0)
            FROM orders
            WHERE created_at >= ? AND created_at < ?
            ",
        )
        .bind(window.start.timestamp_millis())
        .bind(window.end.timestamp_millis())
        .fetch_one(self.pool)
        .await?;

        price_from_column(total, "SUM(total_minor)")
    }

    /// Number of orders inside `window`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn order_count_between(&self, window: ReportWindow) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE created_at >= ? AND created_at < ?",
        )
        .bind(window.start.timestamp_millis())
        .bind(window.end.timestamp_millis())
        .fetch_one(self.pool)
        .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("COUNT(*) = {count}")))
    }

    /// Sales per local calendar date, newest first, at most `limit` dates.
    ///
    /// `utc_offset_secs` shifts stored UTC timestamps onto the local
    /// calendar before grouping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn daily_sales(
        &self,
        utc_offset_secs: i32,
        limit: u32,
    ) -> Result<Vec<DailySales>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySalesRow>(
            r"
            SELECT date(created_at / 1000 + ?, 'unixepoch') AS day,
                   SUM(total_minor) AS total_minor
            FROM orders
            GROUP BY day
            ORDER BY day DESC
            LIMIT ?
            ",
        )
        .bind(utc_offset_secs)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(DailySales::try_from).collect()
    }

    /// Order totals inside `window`, grouped by payment method.
    ///
    /// Methods with no sales are absent; see `PaymentSplit::from_totals`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn totals_by_payment_method(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<PaymentMethodTotal>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentTotalRow>(
            r"
            SELECT payment_method, SUM(total_minor) AS total_minor
            FROM orders
            WHERE created_at >= ? AND created_at < ?
            GROUP BY payment_method
            ORDER BY payment_method
            ",
        )
        .bind(window.start.timestamp_millis())
        .bind(window.end.timestamp_millis())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PaymentMethodTotal::try_from).collect()
    }

    /// One row per order line, newest order first.
    ///
    /// Lines whose menu item has since been deleted are reported under
    /// `Item #<id>`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn report_rows(&self) -> Result<Vec<SalesReportRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r"
            SELECT o.id AS order_id,
                   o.created_at,
                   o.payment_method,
                   COALESCE(m.name, 'Item #' || oi.menu_item_id) AS item_name,
                   oi.quantity,
                   oi.price_minor
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN menu_items m ON m.id = oi.menu_item_id
            ORDER BY o.created_at DESC, o.id DESC, oi.menu_item_id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(SalesReportRow::try_from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use till_core::{Cart, MenuItem, MenuItemDraft};

    use super::*;
    use crate::db::{MenuItemRepository, OrderRepository, create_pool, migrate};

    async fn pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    async fn sell(
        pool: &SqlitePool,
        item: &MenuItem,
        quantity: u32,
        method: PaymentMethod,
        at: DateTime<Utc>,
    ) {
        let mut cart = Cart::new();
        for _ in 0..quantity {
            cart.add(item);
        }
        cart.set_payment_method(method);
        OrderRepository::new(pool)
            .create(&cart.pending_order().unwrap(), at)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_store_has_zero_revenue() {
        let pool = pool().await;
        let sales = SalesRepository::new(&pool);
        let window = ReportWindow::today(&Utc::now());

        assert_eq!(sales.revenue_between(window).await.unwrap(), Price::ZERO);
        assert_eq!(sales.order_count_between(window).await.unwrap(), 0);
        assert!(sales.daily_sales(0, 7).await.unwrap().is_empty());
        assert!(sales.totals_by_payment_method(window).await.unwrap().is_empty());
        assert!(sales.report_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aggregates_respect_window_and_method() {
        let pool = pool().await;
        let tea = MenuItemRepository::new(&pool)
            .create(&MenuItemDraft::new("Tea", Price::parse("20").unwrap(), "Drinks"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2026, 5, 9, 9, 0, 0).unwrap();
        sell(&pool, &tea, 2, PaymentMethod::Cash, now).await;
        sell(&pool, &tea, 1, PaymentMethod::Upi, now).await;
        sell(&pool, &tea, 5, PaymentMethod::Cash, yesterday).await;

        let sales = SalesRepository::new(&pool);
        let today = ReportWindow::today(&now);
        assert_eq!(sales.revenue_between(today).await.unwrap().to_string(), "60.00");
        assert_eq!(sales.order_count_between(today).await.unwrap(), 2);

        let split = sales.totals_by_payment_method(today).await.unwrap();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].payment_method, PaymentMethod::Cash);
        assert_eq!(split[0].total.to_string(), "40.00");

        let week = ReportWindow::last_seven_days(&now);
        let weekly = sales.totals_by_payment_method(week).await.unwrap();
        assert_eq!(weekly[0].total.to_string(), "140.00");

        let daily = sales.daily_sales(0, 7).await.unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());
        assert_eq!(daily[0].total.to_string(), "60.00");
        assert_eq!(daily[1].total.to_string(), "100.00");
    }

    #[tokio::test]
    async fn test_daily_sales_uses_local_offset() {
        let pool = pool().await;
        let tea = MenuItemRepository::new(&pool)
            .create(&MenuItemDraft::new("Tea", Price::parse("20").unwrap(), "Drinks"))
            .await
            .unwrap();
        // 20:00 UTC is 01:30 the next day in IST
        sell(
            &pool,
            &tea,
            1,
            PaymentMethod::Cash,
            Utc.with_ymd_and_hms(2026, 5, 9, 20, 0, 0).unwrap(),
        )
        .await;

        let sales = SalesRepository::new(&pool);
        let utc = sales.daily_sales(0, 7).await.unwrap();
        let ist = sales.daily_sales(5 * 3600 + 1800, 7).await.unwrap();
        assert_eq!(utc[0].date, NaiveDate::from_ymd_opt(2026, 5, 9).unwrap());
        assert_eq!(ist[0].date, NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());
    }

    #[tokio::test]
    async fn test_report_rows_survive_menu_deletion() {
        let pool = pool().await;
        let menu = MenuItemRepository::new(&pool);
        let dal = menu
            .create(&MenuItemDraft::new("Dal", Price::parse("90").unwrap(), "Mains"))
            .await
            .unwrap();
        sell(&pool, &dal, 2, PaymentMethod::Credit, Utc::now()).await;
        menu.delete(dal.id).await.unwrap();

        let rows = SalesRepository::new(&pool).report_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_name, format!("Item #{}", dal.id));
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].line_total().to_string(), "180.00");
    }
}
