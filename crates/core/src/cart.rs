//! The in-session cart for the order being rung up.
//!
//! A [`Cart`] maps menu items to positive quantities and keeps a running
//! total. It is owned by a single order-entry session and mutated through
//! `&mut self` only. At checkout it hands off an immutable [`PendingOrder`]
//! snapshot; the caller persists the snapshot and then calls
//! [`Cart::clear`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MenuItem, MenuItemId, PaymentMethod, Price};

/// Reasons a cart cannot be checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing has been added.
    #[error("the cart is empty, add items before finalizing the sale")]
    EmptyCart,

    /// No payment method is selected.
    #[error("select a payment method before finalizing the sale")]
    NoPaymentMethod,

    /// The total is too large to record.
    #[error("the order total is too large to record, remove some items")]
    TotalTooLarge,
}

/// One distinct item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the menu item as it was last added.
    pub item: MenuItem,
    /// Units in the cart, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// Transient order being built. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    /// Lines in the order each item was first added.
    lines: Vec<CartLine>,
    total: Price,
    payment_method: Option<PaymentMethod>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// An empty cart with the default payment method (cash) selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            total: Price::ZERO,
            payment_method: Some(PaymentMethod::default()),
        }
    }

    /// Add one unit of `item`, returning the new quantity.
    ///
    /// If the item is already in the cart its stored snapshot is replaced
    /// with `item`, so a refreshed price is picked up.
    pub fn add(&mut self, item: &MenuItem) -> u32 {
        self.add_many(item, 1)
    }

    /// Add `quantity` units of `item` at once, returning the new quantity.
    ///
    /// Quantities saturate at `u32::MAX`. Adding zero units changes nothing.
    pub fn add_many(&mut self, item: &MenuItem, quantity: u32) -> u32 {
        if quantity == 0 {
            return self.quantity_of(item.id);
        }
        let quantity = if let Some(line) = self.line_mut(item.id) {
            line.item.clone_from(item);
            line.quantity = line.quantity.saturating_add(quantity);
            line.quantity
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity,
            });
            quantity
        };
        self.recalculate();
        quantity
    }

    /// Add one unit of an item already in the cart.
    ///
    /// Returns the new quantity, or `None` if the item is not in the cart.
    pub fn increment(&mut self, id: MenuItemId) -> Option<u32> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        let quantity = line.quantity;
        self.recalculate();
        Some(quantity)
    }

    /// Remove one unit of an item.
    ///
    /// A line at quantity 1 is removed entirely. Returns the remaining
    /// quantity (`Some(0)` when the line was removed), or `None` if the item
    /// was not in the cart, in which case nothing changes.
    pub fn decrement(&mut self, id: MenuItemId) -> Option<u32> {
        let index = self.position(id)?;
        let line = self.lines.get_mut(index)?;
        let remaining = if line.quantity > 1 {
            line.quantity -= 1;
            line.quantity
        } else {
            self.lines.remove(index);
            0
        };
        self.recalculate();
        Some(remaining)
    }

    /// Select the payment method for the pending checkout.
    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    /// Deselect the payment method. Checkout fails until one is chosen.
    pub const fn clear_payment_method(&mut self) {
        self.payment_method = None;
    }

    /// The selected payment method, if any.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Running total: sum of price × quantity over all lines.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a given item, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Snapshot the cart for checkout without modifying it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there are no lines,
    /// `CheckoutError::NoPaymentMethod` if no method is selected and
    /// `CheckoutError::TotalTooLarge` if the total cannot be stored.
    pub fn pending_order(&self) -> Result<PendingOrder, CheckoutError> {
        if self.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let payment_method = self.payment_method.ok_or(CheckoutError::NoPaymentMethod)?;

        let lines: Vec<PendingOrderLine> = self
            .lines
            .iter()
            .map(|line| PendingOrderLine {
                menu_item_id: line.item.id,
                name: line.item.name.clone(),
                quantity: line.quantity,
                unit_price: line.item.price,
            })
            .collect();

        let total: Price = lines.iter().map(PendingOrderLine::line_total).sum();
        if !total.is_storable() {
            return Err(CheckoutError::TotalTooLarge);
        }

        Ok(PendingOrder {
            total,
            payment_method,
            lines,
        })
    }

    /// Empty the cart after a successful checkout.
    ///
    /// The selected payment method is kept for the next sale.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Price::ZERO;
    }

    fn position(&self, id: MenuItemId) -> Option<usize> {
        self.lines.iter().position(|line| line.item.id == id)
    }

    fn line_mut(&mut self, id: MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item.id == id)
    }

    fn recalculate(&mut self) {
        self.total = self.lines.iter().map(CartLine::line_total).sum();
    }
}

/// Immutable snapshot of a cart, ready to be written as an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Sum of line totals.
    pub total: Price,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
    /// One entry per distinct cart item.
    pub lines: Vec<PendingOrderLine>,
}

/// A cart line captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrderLine {
    /// Menu item sold.
    pub menu_item_id: MenuItemId,
    /// Item name at the time of sale.
    pub name: String,
    /// Units sold.
    pub quantity: u32,
    /// Unit price at the time of sale.
    pub unit_price: Price,
}

impl PendingOrderLine {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn item(id: i32, name: &str, price: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_owned(),
            price: Price::parse(price).unwrap(),
            category: "Drinks".to_owned(),
        }
    }

    fn expected_total(cart: &Cart) -> Price {
        cart.lines()
            .iter()
            .map(|line| line.item.price.times(line.quantity))
            .sum()
    }

    #[test]
    fn test_new_cart_is_empty_with_cash_selected() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.payment_method(), Some(PaymentMethod::Cash));
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        assert_eq!(cart.add(&tea), 1);
        assert_eq!(cart.add(&tea), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(tea.id), 2);
        assert_eq!(cart.total().to_string(), "20.00");
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        let cake = item(2, "Cake", "45");
        cart.add(&cake);
        cart.add(&tea);
        cart.add(&cake);
        let names: Vec<_> = cart.lines().iter().map(|l| l.item.name.as_str()).collect();
        assert_eq!(names, ["Cake", "Tea"]);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        cart.add(&tea);
        assert_eq!(cart.decrement(tea.id), Some(0));
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(tea.id), 0);
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_decrement_absent_item_is_noop() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        cart.add(&tea);
        let before = cart.clone();
        assert_eq!(cart.decrement(MenuItemId::new(99)), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_requires_existing_line() {
        let mut cart = Cart::new();
        assert_eq!(cart.increment(MenuItemId::new(1)), None);
        let tea = item(1, "Tea", "10");
        cart.add(&tea);
        assert_eq!(cart.increment(tea.id), Some(2));
        assert_eq!(cart.total().to_string(), "20.00");
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let menu = [
            item(1, "Tea", "10"),
            item(2, "Coffee", "35.50"),
            item(3, "Cake", "0.99"),
        ];
        let mut cart = Cart::new();
        let mut model: HashMap<MenuItemId, u32> = HashMap::new();

        // A fixed interleaving of adds and removes, including removes of
        // absent items and removes that empty a line.
        let ops: [(bool, usize); 14] = [
            (true, 0),
            (true, 1),
            (true, 1),
            (false, 2),
            (true, 2),
            (false, 0),
            (false, 0),
            (true, 2),
            (true, 2),
            (false, 1),
            (true, 0),
            (false, 2),
            (true, 1),
            (true, 1),
        ];

        for (is_add, index) in ops {
            let target = &menu[index];
            if is_add {
                cart.add(target);
                *model.entry(target.id).or_insert(0) += 1;
            } else {
                cart.decrement(target.id);
                if let Some(quantity) = model.get_mut(&target.id) {
                    *quantity -= 1;
                    if *quantity == 0 {
                        model.remove(&target.id);
                    }
                }
            }

            assert_eq!(cart.total(), expected_total(&cart));
            for line in cart.lines() {
                assert!(line.quantity >= 1);
                assert_eq!(model.get(&line.item.id).copied(), Some(line.quantity));
            }
            assert_eq!(cart.lines().len(), model.len());
        }

        assert_eq!(cart.total().to_string(), "118.48");
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_add_refreshes_item_snapshot() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Tea", "10"));
        cart.add(&item(1, "Tea", "12"));
        assert_eq!(cart.lines()[0].item.price.to_string(), "12.00");
        assert_eq!(cart.total().to_string(), "24.00");
    }

    #[test]
    fn test_pending_order_requires_items() {
        let cart = Cart::new();
        assert_eq!(cart.pending_order(), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_pending_order_requires_payment_method() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Tea", "10"));
        cart.clear_payment_method();
        let before = cart.clone();
        assert_eq!(cart.pending_order(), Err(CheckoutError::NoPaymentMethod));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_pending_order_snapshots_lines() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        let coffee = item(2, "Coffee", "35.50");
        cart.add(&tea);
        cart.add(&coffee);
        cart.add(&tea);
        cart.set_payment_method(PaymentMethod::Upi);

        let pending = cart.pending_order().unwrap();
        assert_eq!(pending.total, cart.total());
        assert_eq!(pending.payment_method, PaymentMethod::Upi);
        assert_eq!(pending.lines.len(), 2);
        assert_eq!(pending.lines[0].menu_item_id, tea.id);
        assert_eq!(pending.lines[0].quantity, 2);
        assert_eq!(pending.lines[0].unit_price, tea.price);
        assert_eq!(pending.lines[1].line_total().to_string(), "35.50");
        // Snapshotting leaves the cart intact
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_many_merges_into_one_line() {
        let mut cart = Cart::new();
        let tea = item(1, "Tea", "10");
        assert_eq!(cart.add_many(&tea, 3), 3);
        assert_eq!(cart.add(&tea), 4);
        assert_eq!(cart.add_many(&tea, 0), 4);
        assert_eq!(cart.add_many(&item(2, "Cake", "1"), 0), 0);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total().to_string(), "40.00");

        assert_eq!(cart.add_many(&tea, u32::MAX), u32::MAX);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_oversized_total_blocks_checkout() {
        let mut cart = Cart::new();
        let gold = MenuItem {
            price: Price::MAX,
            ..item(1, "Gold Leaf Thali", "1")
        };
        assert_eq!(cart.add(&gold), 1);
        assert!(cart.pending_order().is_ok());

        assert_eq!(cart.add(&gold), 2);
        assert_eq!(cart.add_many(&gold, u32::MAX), u32::MAX);
        assert!(!cart.total().is_storable());
        let before = cart.clone();
        assert_eq!(cart.pending_order(), Err(CheckoutError::TotalTooLarge));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_resets_lines_and_total_but_keeps_method() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Tea", "10"));
        cart.set_payment_method(PaymentMethod::Credit);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.payment_method(), Some(PaymentMethod::Credit));
    }
}
