//! Sales aggregate records and reporting windows.
//!
//! Windows are computed in the restaurant's local time zone and expressed as
//! half-open UTC ranges `[start, end)` so they can be compared directly with
//! stored order timestamps.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, PaymentMethod, Price};

/// Number of local days covered by the weekly figures, today included.
pub const WEEK_DAYS: u64 = 7;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The local calendar day containing `now`.
    #[must_use]
    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let date = now.date_naive();
        Self::days_ending(now, date, date)
    }

    /// Today plus the six preceding local days.
    #[must_use]
    pub fn last_seven_days<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let first = today
            .checked_sub_days(Days::new(WEEK_DAYS - 1))
            .unwrap_or(today);
        Self::days_ending(now, first, today)
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    fn days_ending<Tz: TimeZone>(now: &DateTime<Tz>, first: NaiveDate, last: NaiveDate) -> Self {
        let after_last = last.succ_opt().unwrap_or(last);
        Self {
            start: local_midnight(now, first),
            end: local_midnight(now, after_last),
        }
    }
}

/// Midnight at the start of `date` in `now`'s time zone, as UTC.
///
/// If local midnight does not exist (a DST gap), falls back to `now`'s
/// current UTC offset.
fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || {
                let offset = now.offset().fix();
                offset
                    .from_local_datetime(&midnight)
                    .single()
                    .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
            },
            |dt| dt.with_timezone(&Utc),
        )
}

/// Sales total for one local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// Local date of the sales.
    pub date: NaiveDate,
    /// Sum of order totals on that date.
    pub total: Price,
}

/// Sales total for one payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Sum of order totals paid this way.
    pub total: Price,
}

/// Totals for every payment method, zero where there were no sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub cash: Price,
    pub credit: Price,
    pub upi: Price,
}

impl PaymentSplit {
    /// Fold grouped totals into a split. Repeated methods are summed.
    #[must_use]
    pub fn from_totals(totals: &[PaymentMethodTotal]) -> Self {
        totals.iter().fold(Self::default(), |mut split, entry| {
            let slot = match entry.payment_method {
                PaymentMethod::Cash => &mut split.cash,
                PaymentMethod::Credit => &mut split.credit,
                PaymentMethod::Upi => &mut split.upi,
            };
            *slot = *slot + entry.total;
            split
        })
    }

    /// Total for one method.
    #[must_use]
    pub const fn get(&self, method: PaymentMethod) -> Price {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Credit => self.credit,
            PaymentMethod::Upi => self.upi,
        }
    }

    /// Sum across all methods.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cash + self.credit + self.upi
    }
}

/// One order line in the detailed sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReportRow {
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub item_name: String,
    pub quantity: u32,
    pub price_per_item: Price,
}

impl SalesReportRow {
    /// `price_per_item × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price_per_item.times(self.quantity)
    }
}

/// Everything the export collaborator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    /// One row per order line, newest order first.
    pub detailed_sales: Vec<SalesReportRow>,
    /// Payment split for today.
    pub today_split: Vec<PaymentMethodTotal>,
    /// Payment split for the last seven days.
    pub weekly_split: Vec<PaymentMethodTotal>,
}

/// Figures shown on the sales dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Revenue for the current local day.
    pub today_revenue: Price,
    /// Orders finalized during the current local day.
    pub today_order_count: u64,
    /// Up to seven most recent dates with sales, newest first.
    pub daily_sales: Vec<DailySales>,
    /// Payment split for today.
    pub today_split: PaymentSplit,
    /// Payment split for the last seven days.
    pub weekly_split: PaymentSplit,
}
