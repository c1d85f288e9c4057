// src/domain/blinds.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Один уровень блайндов.
/// Пример: level = 3, SB = 100, BB = 200, ante = 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindLevel {
    /// Порядковый номер уровня (1, 2, 3, ...).
    pub level: u32,
    /// Малый блайнд.
    pub small_blind: Chips,
    /// Большой блайнд, всегда ровно 2 × small_blind.
    pub big_blind: Chips,
    /// Размер анте в фишках (0, если нет).
    pub ante: Chips,
}

impl BlindLevel {
    /// Big blind выводится из small blind, а не задаётся отдельно.
    pub fn new(level: u32, small_blind: Chips, ante: Chips) -> Self {
        Self {
            level,
            small_blind,
            big_blind: small_blind.doubled(),
            ante,
        }
    }

    pub fn has_ante(&self) -> bool {
        !self.ante.is_zero()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.level == 0 {
            return Err("BlindLevel: level numbering starts at 1".into());
        }
        if self.big_blind != self.small_blind.doubled() {
            return Err(format!(
                "BlindLevel {}: big_blind ({}) != 2 × small_blind ({})",
                self.level, self.big_blind, self.small_blind
            ));
        }
        Ok(())
    }
}

/// Упорядоченное расписание уровней. После построения не меняется,
/// поэтому его можно свободно читать из любого количества столов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindSchedule {
    pub levels: Vec<BlindLevel>,
}

impl BlindSchedule {
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self { levels }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("BlindSchedule: empty levels".into());
        }

        let mut expected_level = 1u32;
        let mut prev_small = Chips::ZERO;
        for lvl in &self.levels {
            lvl.validate()?;
            if lvl.level != expected_level {
                return Err(format!(
                    "BlindSchedule: expected level {}, got {}",
                    expected_level, lvl.level
                ));
            }
            if lvl.small_blind < prev_small {
                return Err(format!(
                    "BlindSchedule: small blind decreases at level {}",
                    lvl.level
                ));
            }
            prev_small = lvl.small_blind;
            expected_level += 1;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first_level(&self) -> Option<&BlindLevel> {
        self.levels.first()
    }

    pub fn last_level(&self) -> Option<&BlindLevel> {
        self.levels.last()
    }

    pub fn level_by_number(&self, number: u32) -> Option<&BlindLevel> {
        self.levels.iter().find(|lvl| lvl.level == number)
    }

    /// Уровень по прошедшему игровому времени: индекс = число полностью
    /// прошедших интервалов `level_duration`, после конца расписания берётся последний уровень.
    pub fn level_for_elapsed(&self, elapsed: Duration, level_duration: Duration) -> Option<&BlindLevel> {
        let last = self.levels.len().checked_sub(1)?;
        let completed = if level_duration.is_zero() {
            0
        } else {
            usize::try_from(elapsed.as_nanos() / level_duration.as_nanos()).unwrap_or(usize::MAX)
        };
        self.levels.get(completed.min(last))
    }
}
