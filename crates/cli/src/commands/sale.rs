//! One-shot sale command.
//!
//! # Usage
//!
//! ```bash
//! # Two of item 1 and one of item 4, paid by UPI
//! till sale --item 1:2 --item 4 --payment upi
//! ```

use std::str::FromStr;

use chrono::Local;
use thiserror::Error;
use till_core::{MenuItemId, PaymentMethod};
use till_register::{DashboardService, MenuService, OrderEntry, RegisterConfig};

use super::{money, open_database};

/// Errors parsing an `--item` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemArgError {
    #[error("invalid menu item ID '{0}'")]
    InvalidId(String),
    #[error("invalid quantity '{0}', expected a positive whole number")]
    InvalidQuantity(String),
}

/// A menu item and how many units to sell, written `ID` or `ID:QUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemArg {
    pub id: MenuItemId,
    pub quantity: u32,
}

impl FromStr for ItemArg {
    type Err = ItemArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s.split_once(':').unwrap_or((s, "1"));
        let id = id
            .parse::<MenuItemId>()
            .map_err(|_| ItemArgError::InvalidId(id.trim().to_owned()))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| ItemArgError::InvalidQuantity(quantity.trim().to_owned()))?;
        Ok(Self { id, quantity })
    }
}

/// Ring up the given items and finalize the sale.
pub async fn run(
    config: &RegisterConfig,
    items: &[ItemArg],
    payment: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_database(config).await?;
    let menu = MenuService::load(pool.clone()).await?;
    let mut entry = OrderEntry::new(pool.clone(), &menu, DashboardService::new(pool));

    for arg in items {
        entry.add_many(arg.id, arg.quantity)?;
    }
    entry.set_payment_method(payment);

    let order = entry.checkout().await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Order #{} recorded at {}: {} paid by {}",
            order.id,
            order.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            money(config, order.total),
            order.payment_method.label()
        );
    }
    Ok(())
}
