//! Till Core - Domain types and order-entry logic.
//!
//! This crate provides the pieces of the point-of-sale that need no I/O:
//! - [`types`] - Newtype IDs, prices, payment methods, menu and order records
//! - [`cart`] - The in-session cart and its running total
//! - [`catalog`] - Category grouping and text filtering of the menu for display
//! - [`report`] - Sales aggregate records and local-day reporting windows
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no database access,
//! no HTTP clients. Persistence and services live in `till-register`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod report;
pub mod types;

pub use cart::{Cart, CartLine, CheckoutError, PendingOrder, PendingOrderLine};
pub use catalog::{MenuEntry, MenuGroup, group_by_category, group_menu};
pub use report::{
    DailySales, DashboardSummary, PaymentMethodTotal, PaymentSplit, ReportWindow, SalesReport,
    SalesReportRow,
};
pub use types::*;
