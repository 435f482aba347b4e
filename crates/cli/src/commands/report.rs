//! Sales report data command.
//!
//! # Usage
//!
//! ```bash
//! till report                      # JSON on stdout
//! till report --output sales.json  # JSON file
//! ```

use std::path::Path;

use till_register::{DashboardService, RegisterConfig};

use super::open_database;

/// Dump detailed sales rows and payment splits as pretty JSON.
pub async fn run(config: &RegisterConfig, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_database(config).await?;
    let report = DashboardService::new(pool).report().await?;
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!(
                rows = report.detailed_sales.len(),
                path = %path.display(),
                "Sales report written"
            );
        }
        None => {
            #[allow(clippy::print_stdout)]
            {
                println!("{json}");
            }
        }
    }
    Ok(())
}
