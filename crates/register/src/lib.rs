//! Till Register library.
//!
//! Everything between the pure domain types in `till-core` and the `till`
//! command-line tool:
//! - [`config`] - Environment configuration
//! - [`db`] - `SQLite` repositories for the menu, orders and sales aggregates
//! - [`services`] - Menu management, the order-entry session and the dashboard
//! - [`ocr`] - HTTP client for the menu OCR service
//! - [`error`] - The unified [`RegisterError`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod ocr;
pub mod services;

pub use config::{ConfigError, OcrConfig, RegisterConfig};
pub use error::RegisterError;
pub use services::{DashboardService, Feed, MenuService, OrderEntry};
