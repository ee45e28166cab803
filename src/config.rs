//! Startup configuration: the catalog, coin stock and change policy a machine starts with.

use std::str::FromStr;

use thiserror::Error;

use crate::Amount;
use crate::coins::{CoinCounts, Denomination};
use crate::model::{Product, ProductKey};

/// How the change search picks between several valid decompositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Dispense as many coins as possible.
    ///
    /// This is the machine's historical behavior and is kept on purpose even though
    /// most machines minimize coins.
    #[default]
    MostCoins,
    /// Dispense as few coins as possible (equivalently, keep the most coins in stock).
    FewestCoins,
}

impl FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most" | "most-coins" => Ok(TieBreak::MostCoins),
            "fewest" | "fewest-coins" => Ok(TieBreak::FewestCoins),
            other => Err(ConfigError::UnknownTieBreak(other.to_string())),
        }
    }
}

/// Errors detected while building a machine from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate product key '{0}'")]
    DuplicateProduct(ProductKey),

    #[error("unknown tie-break '{0}', expected 'most' or 'fewest'")]
    UnknownTieBreak(String),
}

/// Everything a machine needs at startup.
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub products: Vec<Product>,
    pub coins: CoinCounts,
    /// Order in which change is listed to the customer, ascending unless configured.
    pub coin_order: [Denomination; Denomination::COUNT],
    pub tie_break: TieBreak,
}

impl StartupConfig {
    pub fn new(products: Vec<Product>, coins: CoinCounts) -> Self {
        Self {
            products,
            coins,
            coin_order: Denomination::ALL,
            tie_break: TieBreak::default(),
        }
    }

    /// List `listed` coins first, in that order; the others follow ascending.
    pub fn with_coin_order(mut self, listed: impl IntoIterator<Item = Denomination>) -> Self {
        self.coin_order = Denomination::listing_order(listed);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

impl Default for StartupConfig {
    /// The factory catalog: three products, 15 of each, and 100 coins per denomination
    /// listed as 50c, $1, 25c, $2, $5.
    fn default() -> Self {
        use Denomination::*;

        let products = vec![
            Product::new("Coca Cola", Amount::from_minor(100), 15),
            Product::new("BigMac", Amount::from_minor(250), 15),
            Product::new("The Cake", Amount::from_minor(400), 15),
        ];
        let order = [Cents50, Dollar1, Cents25, Dollar2, Dollar5];
        let coins = order.into_iter().map(|d| (d, 100)).collect();
        Self::new(products, coins).with_coin_order(order)
    }
}
