//! Core domain types for the vending machine.

use std::fmt;

use crate::Amount;

/// Normalized product identifier: lowercase, spaces folded to hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey(String);

impl ProductKey {
    /// Normalize a customer-typed name, e.g. `"Coca Cola"` -> `coca-cola`.
    pub fn normalize(name: &str) -> Self {
        ProductKey(name.to_lowercase().replace(' ', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product offered by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub key: ProductKey,
    pub name: String,
    pub price: Amount,
    pub stock: u32,
}

impl Product {
    /// Create a product keyed by its normalized display name.
    pub fn new(name: impl Into<String>, price: Amount, stock: u32) -> Self {
        let name = name.into();
        Self {
            key: ProductKey::normalize(&name),
            name,
            price,
            stock,
        }
    }

    /// Override the derived key (e.g. `BigMac` keyed as `bigmac`).
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = ProductKey::normalize(key);
        self
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A customer action, the input of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a transaction for a product.
    Select(String),
    /// Insert one coin, given as a coin token such as `50c` or `$2.0`.
    Insert(String),
    /// Switch product, keeping the coins inserted so far.
    Change(String),
    /// List every product with its price and stock.
    Display,
}

impl Command {
    /// Short action name, as written in session files.
    pub fn action(&self) -> &'static str {
        match self {
            Command::Select(_) => "select",
            Command::Insert(_) => "insert",
            Command::Change(_) => "change",
            Command::Display => "display",
        }
    }

    pub fn arg(&self) -> Option<&str> {
        match self {
            Command::Select(arg) | Command::Insert(arg) | Command::Change(arg) => Some(arg),
            Command::Display => None,
        }
    }
}
