//! Customer-facing notifications emitted by the engine.

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

use crate::Amount;
use crate::coins::Denomination;

/// Something the customer should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProductSelected {
        name: String,
        price: Amount,
    },
    BalanceUpdate {
        balance: Amount,
        remaining_due: Amount,
    },
    ProductReselected {
        name: String,
    },
    InsufficientFundsForReselection {
        name: String,
        price: Amount,
        balance: Amount,
    },
    PurchaseSuccess {
        /// Coins handed back, in the machine's coin listing order.
        change: Vec<(Denomination, u32)>,
        product_name: String,
    },
    StockDisplay {
        name: String,
        stock: u32,
        price: Amount,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ProductSelected { name, price } => {
                write!(f, "Product {name} was selected. Please insert: {price}")
            }
            Event::BalanceUpdate {
                balance,
                remaining_due,
            } => write!(f, "Current Balance: {balance}; Please insert: {remaining_due}"),
            Event::ProductReselected { name } => {
                write!(f, "Product {name} was selected. Enough coins provided")
            }
            Event::InsufficientFundsForReselection {
                name,
                price,
                balance,
            } => write!(
                f,
                "Product {name} was selected. Please insert: {price}. Current balance: {balance}"
            ),
            Event::PurchaseSuccess {
                change,
                product_name,
            } => write!(f, "{}. Your product: {product_name}", ChangeBreakdown(change)),
            Event::StockDisplay { name, stock, price } => {
                write!(f, "{name}: price - {price}, in stock - {stock};")
            }
        }
    }
}

/// `Your change: 1 x $0.5; 2 x $0.25;` or `Change not required`.
struct ChangeBreakdown<'a>(&'a [(Denomination, u32)]);

impl fmt::Display for ChangeBreakdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut coins = self.0.iter().filter(|&&(_, count)| count > 0).peekable();
        if coins.peek().is_none() {
            return f.write_str("Change not required");
        }
        f.write_str("Your change:")?;
        for (denomination, count) in coins {
            write!(f, " {count} x {denomination};")?;
        }
        Ok(())
    }
}

/// Receiver of customer notifications (a display, a log, a test recorder).
pub trait Notifier {
    fn notify(&mut self, event: Event);
}

/// Records every event, handy for tests.
impl Notifier for Vec<Event> {
    fn notify(&mut self, event: Event) {
        self.push(event);
    }
}

/// Prints one line per event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&mut self, event: Event) {
        if let Err(e) = writeln!(io::stdout().lock(), "{event}") {
            warn!(error = %e, "failed to write notification");
        }
    }
}
