//! Business logic services for the register.
//!
//! # Services
//!
//! - `menu` - Menu CRUD, manual entry validation and OCR import
//! - `order_entry` - The open order: cart, menu search and checkout
//! - `dashboard` - Sales figures and report data
//! - `feed` - Latest-value channel the menu and dashboard publish through

pub mod dashboard;
pub mod feed;
pub mod menu;
pub mod order_entry;

pub use dashboard::DashboardService;
pub use feed::Feed;
pub use menu::MenuService;
pub use order_entry::OrderEntry;
