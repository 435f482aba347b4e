//! Till CLI - Point-of-sale register for a single restaurant.
//!
//! # Usage
//!
//! ```bash
//! # Create the database schema
//! till migrate
//!
//! # Manage the menu
//! till menu add "Masala Chai" 25 --category Drinks
//! till menu list --search chai
//! till menu scan ./menu-photo.jpg
//!
//! # Ring up sales
//! till register
//! till sale --item 1:2 --item 4 --payment upi
//!
//! # Figures
//! till dashboard
//! till report --output sales.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the database schema
//! - `menu` - List, add, edit, delete and scan menu items
//! - `register` - Interactive order-entry session on stdin
//! - `sale` - Record one sale from arguments
//! - `dashboard` - Today's revenue, daily sales and payment splits
//! - `report` - Dump the sales report data as JSON
//!
//! Logs go to stderr; set `RUST_LOG` to change verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use till_core::{MenuItemId, PaymentMethod};
use till_register::RegisterConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::sale::ItemArg;

const DEFAULT_LOG_FILTER: &str = "till_register=info,till_cli=info";

#[derive(Parser)]
#[command(name = "till")]
#[command(author, version, about = "Till point-of-sale register")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Migrate,
    /// Manage the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Start an interactive order-entry session
    Register,
    /// Record a single sale
    Sale {
        /// Item to sell as `ID` or `ID:QUANTITY` (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<ItemArg>,

        /// Payment method (cash, credit, upi)
        #[arg(short, long, default_value = "cash")]
        payment: PaymentMethod,
    },
    /// Show the sales dashboard
    Dashboard,
    /// Dump the sales report data as JSON
    Report {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// List the menu grouped by category
    List {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a menu item
    Add {
        /// Dish name
        name: String,

        /// Price, e.g. 120 or 45.50
        price: String,

        /// Category
        #[arg(short, long, default_value = till_core::DEFAULT_CATEGORY)]
        category: String,
    },
    /// Change a menu item
    Edit {
        /// Menu item ID
        id: MenuItemId,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New price
        #[arg(short, long)]
        price: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a menu item
    Delete {
        /// Menu item ID
        id: MenuItemId,
    },
    /// Import dishes from a photo of a printed menu
    Scan {
        /// JPEG image of the menu
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegisterConfig::from_env()?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::Menu { action } => match action {
            MenuAction::List { search } => commands::menu::list(&config, &search).await?,
            MenuAction::Add {
                name,
                price,
                category,
            } => commands::menu::add(&config, &name, &price, &category).await?,
            MenuAction::Edit {
                id,
                name,
                price,
                category,
            } => {
                let changes = commands::menu::MenuEdit {
                    name,
                    price,
                    category,
                };
                commands::menu::edit(&config, id, changes).await?;
            }
            MenuAction::Delete { id } => commands::menu::delete(&config, id).await?,
            MenuAction::Scan { image } => commands::menu::scan(&config, &image).await?,
        },
        Commands::Register => commands::register::run(&config).await?,
        Commands::Sale { items, payment } => {
            commands::sale::run(&config, &items, payment).await?;
        }
        Commands::Dashboard => commands::dashboard::run(&config).await?,
        Commands::Report { output } => commands::report::run(&config, output.as_deref()).await?,
    }
    Ok(())
}
