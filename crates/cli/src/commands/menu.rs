//! Menu management commands.
//!
//! # Usage
//!
//! ```bash
//! till menu list --search dosa
//! till menu add "Masala Dosa" 75.50 --category Breakfast
//! till menu edit 3 --price 80
//! till menu delete 3
//! till menu scan ./menu-photo.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `OCR_BASE_URL` - Menu OCR service used by `scan`

use std::path::Path;

use till_core::{MenuItemDraft, MenuItemId, group_menu};
use till_register::ocr::OcrClient;
use till_register::{MenuService, RegisterConfig, RegisterError};

use super::{menu_lines, money, open_database};

/// Field changes for `menu edit`. `None` keeps the current value.
pub struct MenuEdit {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

async fn service(config: &RegisterConfig) -> Result<MenuService, Box<dyn std::error::Error>> {
    let pool = open_database(config).await?;
    Ok(MenuService::new(pool))
}

/// Print the menu grouped by category.
pub async fn list(config: &RegisterConfig, search: &str) -> Result<(), Box<dyn std::error::Error>> {
    let items = service(config).await?.list().await?;
    let entries = group_menu(&items, search.trim());

    #[allow(clippy::print_stdout)]
    {
        if entries.is_empty() {
            println!("No menu items found.");
        }
        for line in menu_lines(config, &entries) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Add a menu item from command-line text.
pub async fn add(
    config: &RegisterConfig,
    name: &str,
    price: &str,
    category: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = service(config)
        .await?
        .create_from_input(name, price, category)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Added [{}] {} ({}) in {}",
            item.id,
            item.name,
            money(config, item.price),
            item.category
        );
    }
    Ok(())
}

/// Apply field changes to an existing menu item.
pub async fn edit(
    config: &RegisterConfig,
    id: MenuItemId,
    changes: MenuEdit,
) -> Result<(), Box<dyn std::error::Error>> {
    let menu = service(config).await?;
    let current = menu.get(id).await?;

    let name = changes.name.unwrap_or(current.name);
    let price = changes.price.unwrap_or_else(|| current.price.to_string());
    let category = changes.category.unwrap_or(current.category);
    let item = MenuItemDraft::parse(&name, &price, &category)
        .map_err(RegisterError::from)?
        .into_item(id);

    menu.update(&item).await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Updated [{}] {} ({}) in {}",
            item.id,
            item.name,
            money(config, item.price),
            item.category
        );
    }
    Ok(())
}

/// Delete a menu item. Recorded sales are kept.
pub async fn delete(config: &RegisterConfig, id: MenuItemId) -> Result<(), Box<dyn std::error::Error>> {
    service(config).await?.delete(id).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Deleted menu item {id}");
    }
    Ok(())
}

/// Upload a menu photo to the OCR service and import what it finds.
pub async fn scan(config: &RegisterConfig, image: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let client = OcrClient::new(&config.ocr)?;
    tracing::info!(image = %image.display(), url = %client.upload_url(), "Uploading menu image...");

    let scanned = client.scan_file(image).await.map_err(RegisterError::from)?;
    let imported = service(config).await?.import(&scanned).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Imported {} of {} scanned items:", imported.len(), scanned.len());
        for item in &imported {
            println!("  [{:>3}] {} ({})", item.id, item.name, money(config, item.price));
        }
    }
    Ok(())
}
