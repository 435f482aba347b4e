//! Database schema command.
//!
//! # Usage
//!
//! ```bash
//! till migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TILL_DATABASE_URL` - `SQLite` connection string (default: `sqlite://till.db?mode=rwc`)
//!
//! The schema lives in `crates/register/migrations/`.

use till_register::RegisterConfig;

use super::{OpenError, open_database};

/// Create the database file if needed and apply the schema.
pub async fn run(config: &RegisterConfig) -> Result<(), OpenError> {
    tracing::info!("Applying schema...");
    let pool = open_database(config).await?;
    pool.close().await;
    tracing::info!("Schema ready at {}", config.database_url);
    Ok(())
}
