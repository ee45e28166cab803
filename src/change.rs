//! Exact change search over a bounded coin pool.
//!
//! The search is a recursive subset-sum over the pool the machine would hold after
//! accepting the payment. A coin equal to the amount owed always wins outright; otherwise
//! every smaller denomination is tried in ascending order and the branches are ranked by
//! the configured [`TieBreak`]. The first branch wins ties.
//!
//! Each branch works on its own copy of the pool. Results are memoized per
//! `(owed, pool)`, which does not change what is returned since the result is a pure
//! function of that pair.

use std::collections::HashMap;

use crate::Amount;
use crate::coins::{CoinCounts, Denomination};
use crate::config::TieBreak;

/// Find coins from `available` summing exactly to `owed`.
///
/// Returns `None` when no combination exists.
pub fn make_change(
    owed: Amount,
    available: &CoinCounts,
    tie_break: TieBreak,
) -> Option<CoinCounts> {
    ChangeSearch::new(tie_break).solve(owed, *available)
}

struct ChangeSearch {
    tie_break: TieBreak,
    memo: HashMap<(Amount, CoinCounts), Option<CoinCounts>>,
}

impl ChangeSearch {
    fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            memo: HashMap::new(),
        }
    }

    fn solve(&mut self, owed: Amount, pool: CoinCounts) -> Option<CoinCounts> {
        if owed == Amount::ZERO {
            return Some(CoinCounts::new());
        }

        if let Some(exact) = Denomination::from_value(owed) {
            if pool.get(exact) > 0 {
                return Some(CoinCounts::new().with_one(exact));
            }
        }

        if pool.is_empty() {
            return None;
        }

        if let Some(cached) = self.memo.get(&(owed, pool)) {
            return *cached;
        }

        let mut best: Option<CoinCounts> = None;
        for denomination in Denomination::ALL {
            let Some(rest) = owed.checked_sub(denomination.value()) else {
                break;
            };
            if rest == Amount::ZERO {
                // equal coin was handled by the shortcut
                break;
            }
            let Some(remaining_pool) = pool.without_one(denomination) else {
                continue;
            };
            let Some(sub) = self.solve(rest, remaining_pool) else {
                continue;
            };
            let candidate = sub.with_one(denomination);
            if self.beats(&candidate, best.as_ref()) {
                best = Some(candidate);
            }
        }

        self.memo.insert((owed, pool), best);
        best
    }

    fn beats(&self, candidate: &CoinCounts, best: Option<&CoinCounts>) -> bool {
        let Some(best) = best else {
            return true;
        };
        match self.tie_break {
            TieBreak::MostCoins => candidate.total_count() > best.total_count(),
            TieBreak::FewestCoins => candidate.total_count() < best.total_count(),
        }
    }
}
