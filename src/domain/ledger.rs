//! Банк игрока: единственное состояние, которое меняется вне игрового цикла стола.
//!
//! Каждая операция выполняется одной критической секцией: проверка и изменение баланса
//! выполняются под одним и тем же захватом мьютекса.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::domain::money::Money;

#[derive(Debug, Default)]
pub struct PlayerLedger {
    balance: Mutex<Money>,
}

impl PlayerLedger {
    pub fn new(initial: Money) -> Self {
        Self {
            balance: Mutex::new(initial),
        }
    }

    /// Текущий баланс (снимок на момент вызова).
    pub fn balance(&self) -> Money {
        *self.lock()
    }

    /// Пополнение всегда успешно. Баланс ограничен сверху `Money::MAX`:
    /// часть суммы сверх потолка не зачисляется.
    pub fn add_funds(&self, amount: Money) {
        let mut balance = self.lock();
        *balance = balance.saturating_add(amount);
    }

    /// Списание: `true` и баланс уменьшен ровно на `amount`,
    /// либо `false` и баланс не тронут.
    pub fn try_remove_funds(&self, amount: Money) -> bool {
        let mut balance = self.lock();
        match balance.checked_sub(amount) {
            Some(rest) => {
                *balance = rest;
                true
            }
            None => false,
        }
    }

    /// Снимок для хранения/передачи.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance(),
        }
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self::new(snapshot.balance)
    }

    // Отравление не страшно: внутри просто целое число, которое пишется одной операцией.
    fn lock(&self) -> MutexGuard<'_, Money> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Сериализуемое состояние банка.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub balance: Money,
}
