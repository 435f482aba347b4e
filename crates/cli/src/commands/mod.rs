//! Subcommand implementations.
//!
//! Every command opens the database named by `TILL_DATABASE_URL` and makes
//! sure the schema exists before doing its work.

pub mod dashboard;
pub mod menu;
pub mod migrate;
pub mod register;
pub mod report;
pub mod sale;

use sqlx::SqlitePool;
use till_core::{MenuEntry, Price};
use till_register::RegisterConfig;
use till_register::db::{self, RepositoryError};

/// Errors that can occur while opening the database.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Connection failed.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// Schema could not be applied.
    #[error("Schema error: {0}")]
    Schema(#[from] RepositoryError),
}

/// Connect and apply the schema.
pub async fn open_database(config: &RegisterConfig) -> Result<SqlitePool, OpenError> {
    tracing::debug!(url = %config.database_url, "Opening database");
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    Ok(pool)
}

/// Format an amount with the configured currency symbol.
pub fn money(config: &RegisterConfig, price: Price) -> String {
    price.display_with(&config.currency_symbol)
}

/// Render the grouped menu, one line per header or item.
pub fn menu_lines(config: &RegisterConfig, entries: &[MenuEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Header { category } => format!("== {category} =="),
            MenuEntry::Item { item } => format!(
                "  [{:>3}] {:<30} {:>10}",
                item.id,
                item.name,
                money(config, item.price)
            ),
        })
        .collect()
}
