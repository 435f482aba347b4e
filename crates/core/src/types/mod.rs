//! Core types for Till.
//!
//! This module provides type-safe wrappers and records for the restaurant's
//! menu and its sales.

pub mod id;
pub mod menu;
pub mod order;
pub mod payment;
pub mod price;

pub use id::*;
pub use menu::{DEFAULT_CATEGORY, MenuItem, MenuItemDraft, MenuItemInputError, SCANNED_CATEGORY};
pub use order::{Order, OrderItem};
pub use payment::PaymentMethod;
pub use price::{DEFAULT_CURRENCY_SYMBOL, Price, PriceError};
