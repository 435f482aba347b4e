//! Sales dashboard command.

use till_core::PaymentMethod;
use till_register::{DashboardService, RegisterConfig};

use super::{money, open_database};

/// Print today's figures, recent daily sales and payment splits.
pub async fn run(config: &RegisterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_database(config).await?;
    let summary = DashboardService::new(pool).summary().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Today's revenue: {}", money(config, summary.today_revenue));
        println!("Orders today:    {}", summary.today_order_count);

        println!();
        println!("Daily sales");
        if summary.daily_sales.is_empty() {
            println!("  No sales recorded yet.");
        }
        for day in &summary.daily_sales {
            println!("  {}  {:>12}", day.date.format("%a %d %b %Y"), money(config, day.total));
        }

        println!();
        println!("{:<14}{:>14}{:>14}", "Payment", "Today", "Last 7 days");
        for method in PaymentMethod::ALL {
            println!(
                "{:<14}{:>14}{:>14}",
                method.label(),
                money(config, summary.today_split.get(method)),
                money(config, summary.weekly_split.get(method))
            );
        }
    }
    Ok(())
}
