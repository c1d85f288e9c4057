use core::fmt;

use serde::{Deserialize, Serialize};

/// Деньги игрока вне стола, в фиксированной точке: целое число центов (2 знака после запятой).
///
/// Храним только целые минорные единицы, поэтому сериализация туда-обратно без потерь.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(u64::MAX);
    pub const CENTS_PER_UNIT: u64 = 100;

    pub const fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    /// `Money::new(12, 34)` = 12.34
    pub fn new(units: u64, cents: u64) -> Self {
        Money(
            units
                .saturating_mul(Self::CENTS_PER_UNIT)
                .saturating_add(cents),
        )
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Money {
    /// Формат `12.34`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / Self::CENTS_PER_UNIT,
            self.0 % Self::CENTS_PER_UNIT
        )
    }
}
