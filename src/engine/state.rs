use crate::Amount;
use crate::coins::{CoinCounts, Denomination};

/// Where the machine is in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// No product selected.
    Idle,
    /// A product is selected and may be partially paid.
    Selecting,
}

/// Coins inserted during the current transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    inserted: CoinCounts,
    balance: Amount,
}

impl Ledger {
    pub fn insert(&mut self, denomination: Denomination) {
        self.inserted.add(denomination, 1);
        self.balance += denomination.value();
    }

    pub fn inserted(&self) -> &CoinCounts {
        &self.inserted
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }
}
