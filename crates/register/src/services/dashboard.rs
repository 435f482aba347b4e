//! Sales dashboard and report data.
//!
//! All figures are computed on demand from the order tables. The local time
//! zone decides where "today" and "the last seven days" begin; the `*_at`
//! variants take an explicit clock so callers can pin the time zone.

use std::sync::Arc;

use chrono::{DateTime, Local, Offset, TimeZone};
use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::{debug, instrument};

use till_core::report::WEEK_DAYS;
use till_core::{DashboardSummary, PaymentSplit, ReportWindow, SalesReport};

use crate::db::SalesRepository;
use crate::error::RegisterError;

use super::feed::Feed;

/// Dashboard service.
///
/// Clones share the same feed.
#[derive(Clone)]
pub struct DashboardService {
    pool: SqlitePool,
    feed: Arc<Feed<DashboardSummary>>,
}

impl DashboardService {
    /// Create a dashboard service with an empty summary.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            feed: Arc::new(Feed::default()),
        }
    }

    /// Subscribe to the dashboard summary.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardSummary> {
        self.feed.subscribe()
    }

    /// Recompute the summary for the local clock and publish it.
    ///
    /// # Errors
    ///
    /// Returns error if an aggregate query fails.
    pub async fn refresh(&self) -> Result<DashboardSummary, RegisterError> {
        self.refresh_at(&Local::now()).await
    }

    /// Recompute the summary as of `now` and publish it.
    ///
    /// # Errors
    ///
    /// Returns error if an aggregate query fails.
    pub async fn refresh_at<Tz>(&self, now: &DateTime<Tz>) -> Result<DashboardSummary, RegisterError>
    where
        Tz: TimeZone,
        Tz::Offset: Send + Sync,
    {
        let summary = self.summary_at(now).await?;
        self.feed.publish(summary.clone());
        Ok(summary)
    }

    /// Dashboard figures for the local clock.
    ///
    /// # Errors
    ///
    /// Returns error if an aggregate query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, RegisterError> {
        self.summary_at(&Local::now()).await
    }

    /// Dashboard figures as of `now`, in `now`'s time zone.
    ///
    /// # Errors
    ///
    /// Returns error if an aggregate query fails.
    #[instrument(skip(self, now))]
    pub async fn summary_at<Tz>(&self, now: &DateTime<Tz>) -> Result<DashboardSummary, RegisterError>
    where
        Tz: TimeZone,
        Tz::Offset: Send + Sync,
    {
        let sales = SalesRepository::new(&self.pool);
        let today = ReportWindow::today(now);
        let week = ReportWindow::last_seven_days(now);
        let utc_offset_secs = now.offset().fix().local_minus_utc();

        let summary = DashboardSummary {
            today_revenue: sales.revenue_between(today).await?,
            today_order_count: sales.order_count_between(today).await?,
            daily_sales: sales.daily_sales(utc_offset_secs, day_limit()).await?,
            today_split: PaymentSplit::from_totals(&sales.totals_by_payment_method(today).await?),
            weekly_split: PaymentSplit::from_totals(&sales.totals_by_payment_method(week).await?),
        };

        debug!(
            today_revenue = %summary.today_revenue,
            today_orders = summary.today_order_count,
            "Dashboard computed"
        );
        Ok(summary)
    }

    /// Report data for the local clock.
    ///
    /// # Errors
    ///
    /// Returns error if a query fails.
    pub async fn report(&self) -> Result<SalesReport, RegisterError> {
        self.report_at(&Local::now()).await
    }

    /// Detailed sales rows plus today's and the weekly payment split.
    ///
    /// # Errors
    ///
    /// Returns error if a query fails.
    #[instrument(skip(self, now))]
    pub async fn report_at<Tz>(&self, now: &DateTime<Tz>) -> Result<SalesReport, RegisterError>
    where
        Tz: TimeZone,
        Tz::Offset: Send + Sync,
    {
        let sales = SalesRepository::new(&self.pool);
        Ok(SalesReport {
            detailed_sales: sales.report_rows().await?,
            today_split: sales
                .totals_by_payment_method(ReportWindow::today(now))
                .await?,
            weekly_split: sales
                .totals_by_payment_method(ReportWindow::last_seven_days(now))
                .await?,
        })
    }
}

fn day_limit() -> u32 {
    u32::try_from(WEEK_DAYS).unwrap_or(u32::MAX)
}
