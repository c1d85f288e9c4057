use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Общий банк раунда.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub total: Chips,
}

impl Pot {
    pub fn new() -> Self {
        Self { total: Chips::ZERO }
    }

    pub fn add(&mut self, amount: Chips) {
        self.total += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
    }

    /// Забрать весь банк (выплата победителю).
    pub fn take(&mut self) -> Chips {
        std::mem::replace(&mut self.total, Chips::ZERO)
    }
}
