//! Payment method enumeration.

use serde::{Deserialize, Serialize};

/// How a finalized order was paid.
///
/// Stored in the database and serialized as the upper-case name
/// (`CASH`, `CREDIT`, `UPI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    /// Credit or debit card.
    Credit,
    /// Unified Payments Interface transfer.
    Upi,
}

impl PaymentMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Credit, Self::Upi];

    /// Stable upper-case name used for storage and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Credit => "CREDIT",
            Self::Upi => "UPI",
        }
    }

    /// Human-friendly label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Credit => "Credit Card",
            Self::Upi => "UPI",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "CREDIT" | "CARD" => Ok(Self::Credit),
            "UPI" => Ok(Self::Upi),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
