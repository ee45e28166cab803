//! Coin denominations and per-denomination coin counts.

use std::fmt;

use crate::Amount;

/// The closed set of coins the machine accepts, ordered by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Denomination {
    Cents25,
    Cents50,
    Dollar1,
    Dollar2,
    Dollar5,
}

impl Denomination {
    pub const COUNT: usize = 5;

    /// Every denomination in ascending value order.
    pub const ALL: [Denomination; Self::COUNT] = [
        Denomination::Cents25,
        Denomination::Cents50,
        Denomination::Dollar1,
        Denomination::Dollar2,
        Denomination::Dollar5,
    ];

    pub const fn value(self) -> Amount {
        Amount::from_minor(match self {
            Denomination::Cents25 => 25,
            Denomination::Cents50 => 50,
            Denomination::Dollar1 => 100,
            Denomination::Dollar2 => 200,
            Denomination::Dollar5 => 500,
        })
    }

    /// Map a coin token as typed by the customer.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "25c" | "$0.25" => Some(Denomination::Cents25),
            "50c" | "$0.5" => Some(Denomination::Cents50),
            "$1.0" => Some(Denomination::Dollar1),
            "$2.0" => Some(Denomination::Dollar2),
            "$5.0" => Some(Denomination::Dollar5),
            _ => None,
        }
    }

    pub fn from_value(value: Amount) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.value() == value)
    }

    /// Order coins for listings: `listed` first, by first appearance, then the rest
    /// ascending.
    pub fn listing_order(
        listed: impl IntoIterator<Item = Denomination>,
    ) -> [Denomination; Self::COUNT] {
        let mut order = Self::ALL;
        let mut placed = 0;
        for denomination in listed.into_iter().chain(Self::ALL) {
            if !order[..placed].contains(&denomination) {
                order[placed] = denomination;
                placed += 1;
            }
        }
        order
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A coin count pushed outside what a `u32` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOutOfRange {
    Negative(Denomination),
    Overflow(Denomination),
}

/// Number of coins held per denomination.
///
/// Used for the machine's coin stock, the coins inserted during a transaction
/// and the change handed back. `Copy` so the change search can branch on cheap snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoinCounts([u32; Denomination::COUNT]);

impl CoinCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, denomination: Denomination) -> u32 {
        self.0[denomination.index()]
    }

    /// Saturates at `u32::MAX`.
    pub fn add(&mut self, denomination: Denomination, count: u32) {
        let slot = &mut self.0[denomination.index()];
        *slot = slot.saturating_add(count);
    }

    /// Copy with one coin of `denomination` removed, or `None` if there is none.
    pub fn without_one(&self, denomination: Denomination) -> Option<Self> {
        let mut next = *self;
        let slot = &mut next.0[denomination.index()];
        *slot = slot.checked_sub(1)?;
        Some(next)
    }

    /// Copy with one more coin of `denomination`.
    pub fn with_one(&self, denomination: Denomination) -> Self {
        let mut next = *self;
        next.add(denomination, 1);
        next
    }

    /// Union of two coin piles.
    pub fn merged(&self, other: &CoinCounts) -> Self {
        let mut next = *self;
        for (denomination, count) in other.iter() {
            next.add(denomination, count);
        }
        next
    }

    /// Iterate all denominations in ascending order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// Non-zero counts listed in `order`.
    pub fn in_order(
        &self,
        order: &[Denomination; Denomination::COUNT],
    ) -> Vec<(Denomination, u32)> {
        order
            .iter()
            .map(|&d| (d, self.get(d)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    pub fn total_value(&self) -> Amount {
        self.iter()
            .map(|(d, count)| Amount::from_minor(d.value().minor() * u64::from(count)))
            .sum()
    }

    pub fn total_count(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Apply a signed adjustment to every count.
    ///
    /// Fails on the first denomination whose count would leave the `u32` range.
    pub fn checked_apply(&self, delta: &CoinDelta) -> Result<Self, CountOutOfRange> {
        let mut next = *self;
        for denomination in Denomination::ALL {
            let adjusted = i64::from(self.get(denomination)) + delta.get(denomination);
            next.0[denomination.index()] = u32::try_from(adjusted).map_err(|_| {
                if adjusted < 0 {
                    CountOutOfRange::Negative(denomination)
                } else {
                    CountOutOfRange::Overflow(denomination)
                }
            })?;
        }
        Ok(next)
    }
}

impl FromIterator<(Denomination, u32)> for CoinCounts {
    fn from_iter<I: IntoIterator<Item = (Denomination, u32)>>(iter: I) -> Self {
        let mut counts = CoinCounts::new();
        for (denomination, count) in iter {
            counts.add(denomination, count);
        }
        counts
    }
}

/// Signed per-denomination adjustment to a coin stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoinDelta([i64; Denomination::COUNT]);

impl CoinDelta {
    /// `credit - debit` per denomination.
    pub fn between(credit: &CoinCounts, debit: &CoinCounts) -> Self {
        let mut delta = CoinDelta::default();
        for denomination in Denomination::ALL {
            delta.0[denomination.index()] =
                i64::from(credit.get(denomination)) - i64::from(debit.get(denomination));
        }
        delta
    }

    pub fn get(&self, denomination: Denomination) -> i64 {
        self.0[denomination.index()]
    }
}
