//! Vending transaction engine.
//!
//! The engine owns the inventory, the current selection and the coins inserted so far.
//! A purchase is finalized as soon as the balance covers the price: change is searched
//! in the coin stock plus the inserted coins, and either everything is committed at once
//! or nothing changes.
//! Also supports an async stream of commands.

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::change::make_change;
use crate::coins::{CoinDelta, Denomination};
use crate::config::{ConfigError, StartupConfig, TieBreak};
use crate::inventory::{Inventory, InvariantViolation};
use crate::model::{Command, Product, ProductKey};
use crate::notify::{Event, Notifier, StdoutNotifier};

mod state;
pub use state::{Ledger, MachineState};

mod error;
pub use error::VendError;

/// A single vending machine.
///
/// Every operation runs to completion on `&mut self`, so transactions never interleave.
pub struct Engine<N: Notifier = StdoutNotifier> {
    inventory: Inventory,
    tie_break: TieBreak,
    selection: Option<ProductKey>,
    ledger: Ledger,
    notifier: N,
}

/// Public API
impl<N: Notifier> Engine<N> {
    pub fn new(config: &StartupConfig, notifier: N) -> Result<Self, ConfigError> {
        Ok(Self {
            inventory: Inventory::new(config)?,
            tie_break: config.tie_break,
            selection: None,
            ledger: Ledger::default(),
            notifier,
        })
    }

    /// Run the engine with the given command stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a rejected command is reported to the customer and does not stop the machine
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current machine state
    pub fn apply(&mut self, command: Command) -> Result<(), VendError> {
        let result = match &command {
            Command::Select(name) => self.select_product(name),
            Command::Insert(token) => self.insert_coin(token),
            Command::Change(name) => self.change_product(name),
            Command::Display => {
                self.display_stock();
                Ok(())
            }
        };
        self.log_result(&command, &result);
        result
    }

    /// Select a product to buy.
    ///
    /// The ledger is left alone. Selecting an out-of-stock product clears the selection.
    pub fn select_product(&mut self, name: &str) -> Result<(), VendError> {
        let product = match self.available_product(name) {
            Err(e @ VendError::ProductOutOfStock(_)) => {
                self.selection = None;
                return Err(e);
            }
            other => other?,
        };

        self.selection = Some(product.key);
        self.notifier.notify(Event::ProductSelected {
            name: product.name,
            price: product.price,
        });
        Ok(())
    }

    /// Insert one coin for the selected product.
    ///
    /// Finalizes the purchase once the balance covers the price. If no change can be
    /// made, the coin is refused and the ledger is exactly as before the call.
    pub fn insert_coin(&mut self, token: &str) -> Result<(), VendError> {
        let key = self
            .selection
            .clone()
            .ok_or(VendError::ProductNotSelected)?;
        let denomination = Denomination::from_token(token)
            .ok_or_else(|| VendError::CoinNotValid(token.to_string()))?;
        let price = self.product(&key)?.price;

        let mut ledger = self.ledger;
        ledger.insert(denomination);

        match ledger.balance().checked_sub(price) {
            Some(owed) => self.finalize(&key, &ledger, owed),
            None => {
                self.ledger = ledger;
                self.notifier.notify(Event::BalanceUpdate {
                    balance: ledger.balance(),
                    remaining_due: price.checked_sub(ledger.balance()).unwrap_or_default(),
                });
                Ok(())
            }
        }
    }

    /// Switch to another product, keeping the coins inserted so far.
    ///
    /// Finalizes right away if the balance already covers the new price. On any failure
    /// the previous selection stays in place.
    pub fn change_product(&mut self, name: &str) -> Result<(), VendError> {
        let product = self.available_product(name)?;
        let ledger = self.ledger;

        match ledger.balance().checked_sub(product.price) {
            Some(owed) => {
                self.notifier.notify(Event::ProductReselected {
                    name: product.name.clone(),
                });
                self.finalize(&product.key, &ledger, owed)
            }
            None => {
                self.selection = Some(product.key);
                self.notifier.notify(Event::InsufficientFundsForReselection {
                    name: product.name,
                    price: product.price,
                    balance: ledger.balance(),
                });
                Ok(())
            }
        }
    }

    /// Show every product with its price and stock.
    pub fn display_stock(&mut self) {
        for product in self.inventory.products() {
            self.notifier.notify(Event::StockDisplay {
                name: product.name.clone(),
                stock: product.stock,
                price: product.price,
            });
        }
    }

    pub fn state(&self) -> MachineState {
        match self.selection {
            Some(_) => MachineState::Selecting,
            None => MachineState::Idle,
        }
    }

    pub fn selection(&self) -> Option<&Product> {
        self.selection.as_ref().and_then(|key| self.inventory.get(key))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

/// Private API
impl<N: Notifier> Engine<N> {
    /// Small helper to log `apply` results
    fn log_result(&self, command: &Command, result: &Result<(), VendError>) {
        let action = command.action();
        let arg = command.arg().unwrap_or_default();
        let balance = self.ledger.balance();
        match result {
            Ok(()) => {
                info!(
                    arg = %arg,
                    balance = %balance,
                    state = ?self.state(),
                    "{action} applied"
                );
            }
            Err(e) => {
                warn!(
                    arg = %arg,
                    balance = %balance,
                    reason = %e,
                    "{action} rejected"
                );
            }
        }
    }

    fn product(&self, key: &ProductKey) -> Result<&Product, InvariantViolation> {
        self.inventory
            .get(key)
            .ok_or_else(|| InvariantViolation::UnknownProduct(key.clone()))
    }

    /// Look a product up by name and make sure it can be sold.
    fn available_product(&self, name: &str) -> Result<Product, VendError> {
        let product = self
            .inventory
            .get_product(name)
            .ok_or_else(|| VendError::ProductNotFound(name.to_string()))?;
        if !product.in_stock() {
            return Err(VendError::ProductOutOfStock(product.key.clone()));
        }
        Ok(product.clone())
    }

    /// Complete a purchase paid by `ledger`, `owed` being the overpayment to hand back:
    /// - Re-check the product can still be sold
    /// - Search change in the coin stock plus the inserted coins
    /// - Commit coins and product stock together, then reset the transaction
    ///
    /// Nothing is mutated when an error is returned.
    fn finalize(
        &mut self,
        key: &ProductKey,
        ledger: &Ledger,
        owed: Amount,
    ) -> Result<(), VendError> {
        let product = self.product(key)?;
        if !product.in_stock() {
            return Err(InvariantViolation::StockExhausted(key.clone()).into());
        }
        let product_name = product.name.clone();

        let available = self.inventory.coin_stock().merged(ledger.inserted());
        let change = make_change(owed, &available, self.tie_break)
            .ok_or(VendError::ChangeCantBeProvided { owed })?;

        self.inventory
            .apply_coin_delta(&CoinDelta::between(ledger.inserted(), &change))?;
        // stock was checked above
        self.inventory.decrement_stock(key)?;

        self.ledger = Ledger::default();
        self.selection = None;

        info!(
            product = %key,
            paid = %ledger.balance(),
            change = %change.total_value(),
            coins_dispensed = change.total_count(),
            "purchase completed"
        );
        self.notifier.notify(Event::PurchaseSuccess {
            change: change.in_order(self.inventory.coin_order()),
            product_name,
        });
        Ok(())
    }
}
