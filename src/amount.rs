use std::fmt;

/// Money in minor currency units (cents).
///
/// Displayed in major units with at least one decimal digit, e.g. `$1.0`, `$2.5`, `$0.25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    const SCALE: u64 = 100;

    pub const ZERO: Amount = Amount(0);

    pub const fn from_minor(value: u64) -> Self {
        Amount(value)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        if frac % 10 == 0 {
            write!(f, "${whole}.{}", frac / 10)
        } else {
            write!(f, "${whole}.{frac:02}")
        }
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}
