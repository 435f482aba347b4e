//! Database operations for the point-of-sale `SQLite` store.
//!
//! ## Tables
//!
//! - `menu_items` - Menu with prices and categories
//! - `orders` - One row per finalized sale
//! - `order_items` - Lines of each sale, keyed by `(order_id, menu_item_id)`
//!
//! Aggregates for the dashboard and the sales report are computed by
//! queries over `orders` and `order_items` (see [`sales`]).
//!
//! # Schema
//!
//! The schema is stored in `crates/register/migrations/` and applied via:
//! ```bash
//! cargo run -p till-cli -- migrate
//! ```

pub mod menu_items;
pub mod orders;
pub mod sales;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use till_core::{Price, PriceError};

pub use menu_items::MenuItemRepository;
pub use orders::OrderRepository;
pub use sales::SalesRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the schema failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// An amount could not be converted for storage.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] PriceError),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `SQLite` connection pool.
///
/// The database file is created if missing and foreign keys are enforced.
/// In-memory databases are limited to a single long-lived connection,
/// since every new connection to `:memory:` would open an empty database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));
    let pool_options = if is_in_memory(database_url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// Apply the schema in `crates/register/migrations/`.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// =============================================================================
// Column conversions
// =============================================================================

fn price_from_column(minor_units: i64, column: &str) -> Result<Price, RepositoryError> {
    Price::from_minor_units(minor_units).map_err(|e| {
        RepositoryError::DataCorruption(format!("{column} = {minor_units}: {e}"))
    })
}

fn quantity_from_column(quantity: i64) -> Result<u32, RepositoryError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("quantity = {quantity}")))
}

fn timestamp_from_column(millis: i64) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RepositoryError::DataCorruption(format!("created_at = {millis}")))
}
