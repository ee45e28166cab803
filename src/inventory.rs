//! Product and coin stock held by the machine.

use std::collections::HashMap;

use thiserror::Error;

use crate::Amount;
use crate::coins::{CoinCounts, CoinDelta, CountOutOfRange, Denomination};
use crate::config::{ConfigError, StartupConfig};
use crate::model::{Product, ProductKey};

/// Internal consistency failure. Unreachable while the engine validates before committing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("product '{0}' is not in the catalog")]
    UnknownProduct(ProductKey),

    #[error("product '{0}' has no stock left to decrement")]
    StockExhausted(ProductKey),

    #[error("coin stock for {0} would go negative")]
    NegativeCoinCount(Denomination),

    #[error("coin stock for {0} would overflow")]
    CoinCountOverflow(Denomination),
}

impl From<CountOutOfRange> for InvariantViolation {
    fn from(e: CountOutOfRange) -> Self {
        match e {
            CountOutOfRange::Negative(denomination) => Self::NegativeCoinCount(denomination),
            CountOutOfRange::Overflow(denomination) => Self::CoinCountOverflow(denomination),
        }
    }
}

/// Product stock and coin stock.
///
/// Products keep their catalog order for listings, coins their configured order.
#[derive(Debug, Clone)]
pub struct Inventory {
    products: Vec<Product>,
    index: HashMap<ProductKey, usize>,
    coins: CoinCounts,
    coin_order: [Denomination; Denomination::COUNT],
}

impl Inventory {
    pub fn new(config: &StartupConfig) -> Result<Self, ConfigError> {
        let mut products = Vec::with_capacity(config.products.len());
        let mut index = HashMap::with_capacity(config.products.len());

        for product in &config.products {
            let mut product = product.clone();
            product.key = ProductKey::normalize(product.key.as_str());
            if index.contains_key(&product.key) {
                return Err(ConfigError::DuplicateProduct(product.key));
            }
            index.insert(product.key.clone(), products.len());
            products.push(product);
        }

        Ok(Self {
            products,
            index,
            coins: config.coins,
            coin_order: config.coin_order,
        })
    }

    /// Look a product up by a customer-typed name (normalized first).
    pub fn get_product(&self, name: &str) -> Option<&Product> {
        self.get(&ProductKey::normalize(name))
    }

    /// Look a product up by its key.
    pub fn get(&self, key: &ProductKey) -> Option<&Product> {
        self.index.get(key).map(|&i| &self.products[i])
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter()
    }

    pub fn decrement_stock(&mut self, key: &ProductKey) -> Result<(), InvariantViolation> {
        let i = *self
            .index
            .get(key)
            .ok_or_else(|| InvariantViolation::UnknownProduct(key.clone()))?;
        let product = &mut self.products[i];
        product.stock = product
            .stock
            .checked_sub(1)
            .ok_or_else(|| InvariantViolation::StockExhausted(key.clone()))?;
        Ok(())
    }

    pub fn coin_stock(&self) -> &CoinCounts {
        &self.coins
    }

    /// Order in which coins are listed to the customer.
    pub fn coin_order(&self) -> &[Denomination; Denomination::COUNT] {
        &self.coin_order
    }

    pub fn total_coin_value(&self) -> Amount {
        self.coins.total_value()
    }

    pub fn total_coin_count(&self) -> u64 {
        self.coins.total_count()
    }

    /// Apply a signed adjustment to every denomination at once.
    ///
    /// Nothing changes if any count would go negative or overflow.
    pub fn apply_coin_delta(&mut self, delta: &CoinDelta) -> Result<(), InvariantViolation> {
        self.coins = self.coins.checked_apply(delta)?;
        Ok(())
    }
}
