// src/domain/rules.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::blinds::{BlindLevel, BlindSchedule};
use crate::domain::chips::Chips;
use crate::domain::money::Money;
use crate::domain::rebuy::RebuyPolicy;
use crate::engine::blind_schedule::build_schedule;

/// Режим игры.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameMode {
    /// Фиксированные блайнды, без анте и без роста.
    Cash,
    /// Блайнды растут по расписанию, во второй половине появляется анте.
    Tournament,
}

/// Отношение small blind к бай-ину (1:N).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlindRatio {
    OneTo5,
    OneTo10,
    OneTo20,
    OneTo25,
    OneTo40,
    OneTo50,
    OneTo80,
    OneTo100,
    OneTo200,
}

impl BlindRatio {
    pub fn divisor(self) -> u64 {
        match self {
            BlindRatio::OneTo5 => 5,
            BlindRatio::OneTo10 => 10,
            BlindRatio::OneTo20 => 20,
            BlindRatio::OneTo25 => 25,
            BlindRatio::OneTo40 => 40,
            BlindRatio::OneTo50 => 50,
            BlindRatio::OneTo80 => 80,
            BlindRatio::OneTo100 => 100,
            BlindRatio::OneTo200 => 200,
        }
    }

    pub fn from_divisor(divisor: u64) -> Option<Self> {
        let ratio = match divisor {
            5 => BlindRatio::OneTo5,
            10 => BlindRatio::OneTo10,
            20 => BlindRatio::OneTo20,
            25 => BlindRatio::OneTo25,
            40 => BlindRatio::OneTo40,
            50 => BlindRatio::OneTo50,
            80 => BlindRatio::OneTo80,
            100 => BlindRatio::OneTo100,
            200 => BlindRatio::OneTo200,
            _ => return None,
        };
        Some(ratio)
    }
}

/// Отношение анте к big blind (1:N).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnteRatio {
    OneTo2,
    OneTo4,
    OneTo5,
    OneTo8,
    OneTo10,
}

impl AnteRatio {
    pub fn divisor(self) -> u64 {
        match self {
            AnteRatio::OneTo2 => 2,
            AnteRatio::OneTo4 => 4,
            AnteRatio::OneTo5 => 5,
            AnteRatio::OneTo8 => 8,
            AnteRatio::OneTo10 => 10,
        }
    }

    pub fn from_divisor(divisor: u64) -> Option<Self> {
        let ratio = match divisor {
            2 => AnteRatio::OneTo2,
            4 => AnteRatio::OneTo4,
            5 => AnteRatio::OneTo5,
            8 => AnteRatio::OneTo8,
            10 => AnteRatio::OneTo10,
            _ => return None,
        };
        Some(ratio)
    }
}

/// Структура ставок: всё, из чего выводится расписание блайндов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingStructure {
    pub mode: GameMode,
    /// Бай-ин в фишках (стартовый стек).
    pub buy_in: Chips,
    pub blind_ratio: BlindRatio,
    /// Потолок расписания: big blind последнего уровня = buy_in × max_buy_in_ratio.
    pub max_buy_in_ratio: u32,
    pub ante_ratio: AnteRatio,
    /// Количество уровней турнирного расписания (в кеше игнорируется).
    pub level_count: u32,
}

impl BettingStructure {
    pub const DEFAULT_LEVEL_COUNT: u32 = 12;

    pub fn cash(buy_in: Chips, blind_ratio: BlindRatio) -> Self {
        Self {
            mode: GameMode::Cash,
            buy_in,
            blind_ratio,
            max_buy_in_ratio: 1,
            ante_ratio: AnteRatio::OneTo5,
            level_count: 1,
        }
    }

    pub fn tournament(
        buy_in: Chips,
        blind_ratio: BlindRatio,
        max_buy_in_ratio: u32,
        ante_ratio: AnteRatio,
    ) -> Self {
        Self {
            mode: GameMode::Tournament,
            buy_in,
            blind_ratio,
            max_buy_in_ratio,
            ante_ratio,
            level_count: Self::DEFAULT_LEVEL_COUNT,
        }
    }
}

/// Правила игры за столом. Создаётся только через `RuleSet::new`,
/// расписание блайндов считается один раз и кешируется.
/// Без Deserialize: правила создаются только через валидацию.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RuleSet {
    betting: BettingStructure,
    rebuy: RebuyPolicy,
    /// Цена одного бай-ина (и ребая) в деньгах банка игрока.
    buy_in_price: Money,
    schedule: BlindSchedule,
}

impl RuleSet {
    pub fn new(
        betting: BettingStructure,
        rebuy: RebuyPolicy,
        buy_in_price: Money,
    ) -> Result<Self, ConfigError> {
        let schedule = build_schedule(&betting)?;
        schedule.validate().map_err(ConfigError::InvalidSchedule)?;

        Ok(Self {
            betting,
            rebuy,
            buy_in_price,
            schedule,
        })
    }

    pub fn betting(&self) -> &BettingStructure {
        &self.betting
    }

    pub fn mode(&self) -> GameMode {
        self.betting.mode
    }

    pub fn buy_in(&self) -> Chips {
        self.betting.buy_in
    }

    pub fn rebuy_policy(&self) -> &RebuyPolicy {
        &self.rebuy
    }

    pub fn buy_in_price(&self) -> Money {
        self.buy_in_price
    }

    pub fn schedule(&self) -> &BlindSchedule {
        &self.schedule
    }

    /// Уровень 1. Расписание после валидации никогда не пустое.
    pub fn opening_level(&self) -> BlindLevel {
        self.schedule
            .first_level()
            .cloned()
            .unwrap_or_else(|| BlindLevel::new(1, Chips::ZERO, Chips::ZERO))
    }
}

/// Параметры времени и посадки для одного стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    /// Минимум готовых к игре мест для старта раунда.
    pub min_players: usize,
    /// Раньше этого смещения от открытия стола игра не начнётся.
    pub start_game_after: Duration,
    /// Пауза перед первым раундом после выполнения условий старта.
    pub start_delay: Duration,
    /// Как часто перепроверять условия старта.
    pub poll_interval: Duration,
    /// Длительность одного уровня блайндов.
    pub level_duration: Duration,
    /// Пауза между раундами.
    pub hand_pause: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_players: 2,
            start_game_after: Duration::ZERO,
            start_delay: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
            level_duration: Duration::from_secs(10 * 60),
            hand_pause: Duration::from_secs(2),
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::InvalidSettings(format!(
                "min_players = {} (need at least 2)",
                self.min_players
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidSettings("poll_interval = 0".into()));
        }
        if self.level_duration.is_zero() {
            return Err(ConfigError::InvalidSettings("level_duration = 0".into()));
        }
        Ok(())
    }
}

/// Ошибки конфигурации: фатальны, объект с такими параметрами не создаётся.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("buy-in must be positive")]
    ZeroBuyIn,

    #[error("ratio `{0}` must be positive")]
    ZeroRatio(&'static str),

    #[error("tournament schedule needs at least one level")]
    ZeroLevelCount,

    #[error("buy-in {buy_in} at 1:{divisor} gives a small blind below one chip")]
    BlindBelowOneChip { buy_in: Chips, divisor: u64 },

    #[error("table must have between 2 and {max} seats, got {got}")]
    InvalidSeatCount { got: usize, max: usize },

    #[error("invalid blind schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid game settings: {0}")]
    InvalidSettings(String),
}
