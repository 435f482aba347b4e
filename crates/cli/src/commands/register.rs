//! Interactive order-entry session.
//!
//! Reads one command per line from stdin:
//!
//! ```text
//! menu                 show the (filtered) menu
//! search <text>        filter the menu by name; `search` alone clears it
//! add <id> [qty]       add units of a menu item
//! rm <id>              remove one unit
//! pay <method|none>    select cash, credit or upi
//! show                 show the cart
//! checkout             finalize the sale
//! help                 list commands
//! quit                 leave the session
//! ```

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use till_core::{MenuItemId, PaymentMethod};
use till_register::{DashboardService, MenuService, OrderEntry, RegisterConfig, RegisterError};

use super::{menu_lines, money, open_database};

const HELP: &str = "\
Commands:
  menu                 show the menu
  search <text>        filter the menu by name (no text clears the filter)
  add <id> [qty]       add units of a menu item
  rm <id>              remove one unit of a menu item
  pay <method|none>    select cash, credit or upi
  show                 show the cart
  checkout             finalize the sale
  quit                 leave the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Menu,
    Search(String),
    Add(MenuItemId, u32),
    Remove(MenuItemId),
    Pay(Option<PaymentMethod>),
    Show,
    Checkout,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ParseError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn parse_line(line: &str) -> Result<Option<SessionCommand>, ParseError> {
    let line = line.trim();
    let Some((word, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .or_else(|| (!line.is_empty()).then_some((line, "")))
    else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "menu" | "m" => SessionCommand::Menu,
        "search" | "s" => SessionCommand::Search(rest.to_owned()),
        "add" | "a" => {
            let mut args = rest.split_whitespace();
            let id = args
                .next()
                .and_then(|id| id.parse().ok())
                .ok_or(ParseError::Usage("add <id> [qty]"))?;
            let quantity = match args.next() {
                Some(qty) => qty
                    .parse::<u32>()
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or(ParseError::Usage("add <id> [qty]"))?,
                None => 1,
            };
            SessionCommand::Add(id, quantity)
        }
        "rm" | "remove" => {
            let id = rest.parse().map_err(|_| ParseError::Usage("rm <id>"))?;
            SessionCommand::Remove(id)
        }
        "pay" => {
            if rest.eq_ignore_ascii_case("none") {
                SessionCommand::Pay(None)
            } else {
                let method = rest
                    .parse()
                    .map_err(|_| ParseError::Usage("pay cash|credit|upi|none"))?;
                SessionCommand::Pay(Some(method))
            }
        }
        "show" | "cart" => SessionCommand::Show,
        "checkout" | "done" => SessionCommand::Checkout,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// Run the session until `quit` or end of input.
pub async fn run(config: &RegisterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = open_database(config).await?;
    let menu = MenuService::load(pool.clone()).await?;
    let dashboard = DashboardService::new(pool.clone());
    let mut entry = OrderEntry::new(pool, &menu, dashboard);

    tracing::info!("Order-entry session started");
    print_block(&[HELP.to_owned()]);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                print_block(&[e.to_string()]);
                continue;
            }
        };

        if command == SessionCommand::Quit {
            break;
        }

        match execute(config, &mut entry, command).await {
            Ok(output) => print_block(&output),
            Err(e) if e.is_recoverable() => print_block(&[format!("! {e}")]),
            Err(e) => return Err(e.into()),
        }
    }

    if !entry.cart().is_empty() {
        tracing::warn!(
            items = entry.cart().item_count(),
            "Session ended with an unfinished order"
        );
    }
    Ok(())
}

async fn execute(
    config: &RegisterConfig,
    entry: &mut OrderEntry,
    command: SessionCommand,
) -> Result<Vec<String>, RegisterError> {
    let output = match command {
        SessionCommand::Menu => menu_view(config, entry),
        SessionCommand::Search(query) => {
            entry.set_query(&query);
            menu_view(config, entry)
        }
        SessionCommand::Add(id, quantity) => {
            let count = entry.add_many(id, quantity)?;
            let mut out = vec![format!("Item {id} x{count}")];
            out.extend(cart_view(config, entry));
            out
        }
        SessionCommand::Remove(id) => {
            let message = match entry.decrement(id) {
                Some(0) => format!("Removed item {id}"),
                Some(count) => format!("Item {id} x{count}"),
                None => format!("Item {id} is not in the order"),
            };
            let mut out = vec![message];
            out.extend(cart_view(config, entry));
            out
        }
        SessionCommand::Pay(Some(method)) => {
            entry.set_payment_method(method);
            vec![format!("Payment: {}", method.label())]
        }
        SessionCommand::Pay(None) => {
            entry.clear_payment_method();
            vec!["Payment: not selected".to_owned()]
        }
        SessionCommand::Show => cart_view(config, entry),
        SessionCommand::Checkout => {
            let order = entry.checkout().await?;
            vec![format!(
                "Order #{} saved: {} ({})",
                order.id,
                money(config, order.total),
                order.payment_method.label()
            )]
        }
        SessionCommand::Help | SessionCommand::Quit => vec![HELP.to_owned()],
    };
    Ok(output)
}

fn menu_view(config: &RegisterConfig, entry: &OrderEntry) -> Vec<String> {
    let lines = menu_lines(config, &entry.menu_display());
    if lines.is_empty() {
        vec!["No menu items found.".to_owned()]
    } else {
        lines
    }
}

fn cart_view(config: &RegisterConfig, entry: &OrderEntry) -> Vec<String> {
    let cart = entry.cart();
    let mut out: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "  {:>3} x {:<28} {:>10}",
                line.quantity,
                line.item.name,
                money(config, line.line_total())
            )
        })
        .collect();
    if out.is_empty() {
        out.push("  (empty)".to_owned());
    }
    out.push(format!(
        "Items ({})  Total {}  Payment {}",
        cart.item_count(),
        money(config, cart.total()),
        cart.payment_method().map_or("not selected", |m| m.label())
    ));
    out
}

fn print_block(lines: &[String]) {
    #[allow(clippy::print_stdout)]
    {
        for line in lines {
            println!("{line}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("menu").unwrap(), Some(SessionCommand::Menu));
        assert_eq!(
            parse_line("add 3").unwrap(),
            Some(SessionCommand::Add(MenuItemId::new(3), 1))
        );
        assert_eq!(
            parse_line("ADD 3 4").unwrap(),
            Some(SessionCommand::Add(MenuItemId::new(3), 4))
        );
        assert_eq!(
            parse_line("rm 3").unwrap(),
            Some(SessionCommand::Remove(MenuItemId::new(3)))
        );
        assert_eq!(
            parse_line("search  cold coffee ").unwrap(),
            Some(SessionCommand::Search("cold coffee".to_owned()))
        );
        assert_eq!(
            parse_line("search").unwrap(),
            Some(SessionCommand::Search(String::new()))
        );
        assert_eq!(
            parse_line("pay upi").unwrap(),
            Some(SessionCommand::Pay(Some(PaymentMethod::Upi)))
        );
        assert_eq!(
            parse_line("pay none").unwrap(),
            Some(SessionCommand::Pay(None))
        );
        assert_eq!(parse_line("quit").unwrap(), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("dance"),
            Err(ParseError::Unknown("dance".to_owned()))
        );
        assert!(matches!(parse_line("add"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_line("add 2 0"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_line("pay cheque"), Err(ParseError::Usage(_))));
    }
}
