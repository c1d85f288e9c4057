use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Ограничение политики ребаев: либо без лимита, либо не больше `n`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RebuyLimit {
    Unlimited,
    AtMost(u64),
}

impl RebuyLimit {
    /// Из "сырого" значения конфига: любое отрицательное (обычно -1) = без лимита.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            RebuyLimit::Unlimited
        } else {
            RebuyLimit::AtMost(raw as u64)
        }
    }

    pub fn allows_at_most(&self, value: u64) -> bool {
        match self {
            RebuyLimit::Unlimited => true,
            RebuyLimit::AtMost(max) => value <= *max,
        }
    }

    pub fn allows_below(&self, value: u64) -> bool {
        match self {
            RebuyLimit::Unlimited => true,
            RebuyLimit::AtMost(max) => value < *max,
        }
    }
}

/// Политика ребаев стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RebuyPolicy {
    /// Сколько ребаев разрешено одному месту.
    pub max_rebuys: RebuyLimit,
    /// До какого уровня блайндов (включительно) ребай ещё открыт.
    pub max_rebuy_level: RebuyLimit,
    /// Ребай возможен, только если стек не больше этого значения.
    pub max_chips_for_rebuy: RebuyLimit,
}

impl RebuyPolicy {
    /// Ребаи запрещены (freezeout).
    pub fn disabled() -> Self {
        Self {
            max_rebuys: RebuyLimit::AtMost(0),
            max_rebuy_level: RebuyLimit::Unlimited,
            max_chips_for_rebuy: RebuyLimit::Unlimited,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            max_rebuys: RebuyLimit::Unlimited,
            max_rebuy_level: RebuyLimit::Unlimited,
            max_chips_for_rebuy: RebuyLimit::Unlimited,
        }
    }

    pub fn can_rebuy(&self, current_rebuy_count: u32, elapsed_level: u32, current_chips: Chips) -> bool {
        self.max_rebuys.allows_below(u64::from(current_rebuy_count))
            && self.max_rebuy_level.allows_at_most(u64::from(elapsed_level))
            && self.max_chips_for_rebuy.allows_at_most(current_chips.0)
    }
}
