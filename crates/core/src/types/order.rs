//! Finalized order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MenuItemId, OrderId};
use super::payment::PaymentMethod;
use super::price::Price;

/// A finalized sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Auto-assigned order ID.
    pub id: OrderId,
    /// When the sale was finalized.
    pub timestamp: DateTime<Utc>,
    /// Sum of the line totals at the time of sale.
    pub total: Price,
    /// How the order was paid.
    pub payment_method: PaymentMethod,
}

/// One line of a finalized order, keyed by `(order_id, menu_item_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Parent order.
    pub order_id: OrderId,
    /// Menu item sold.
    pub menu_item_id: MenuItemId,
    /// Units sold, always at least 1.
    pub quantity: u32,
    /// Unit price captured at the time of sale.
    pub price: Price,
}

impl OrderItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}
