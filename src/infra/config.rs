//! Конфигурация симуляции из переменных окружения.
//!
//! Все ключи необязательны: нераспознанное или отсутствующее значение = значение по умолчанию.
//! Ограничения ребаев принимают `-1` как "без лимита".

use std::time::Duration;

use crate::domain::chips::Chips;
use crate::domain::money::Money;
use crate::domain::rebuy::{RebuyLimit, RebuyPolicy};
use crate::domain::rules::{AnteRatio, BettingStructure, BlindRatio, GameMode, GameSettings};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub tables: usize,
    pub players_per_table: usize,
    pub max_seats: usize,
    pub betting: BettingStructure,
    pub rebuy: RebuyPolicy,
    pub buy_in_price: Money,
    pub starting_balance: Money,
    pub settings: GameSettings,
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_u64 = |key: &str, fallback: u64| -> u64 {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(fallback)
        };
        // Значения, не влезающие в целевой тип, тоже считаются нераспознанными.
        let read_u32 = |key: &str, fallback: u32| -> u32 {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .unwrap_or(fallback)
        };
        let read_usize = |key: &str, fallback: usize| -> usize {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .unwrap_or(fallback)
        };
        let read_i64 = |key: &str, fallback: i64| -> i64 {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .unwrap_or(fallback)
        };
        let read_ms = |key: &str, fallback: u64| Duration::from_millis(read_u64(key, fallback));

        let mode = match lookup("POKER_MODE").as_deref().map(str::trim) {
            Some("cash") | Some("Cash") => GameMode::Cash,
            _ => GameMode::Tournament,
        };

        let blind_ratio = BlindRatio::from_divisor(read_u64("POKER_BLIND_RATIO", 80))
            .unwrap_or(BlindRatio::OneTo80);
        let ante_ratio = AnteRatio::from_divisor(read_u64("POKER_ANTE_RATIO", 5))
            .unwrap_or(AnteRatio::OneTo5);

        let betting = BettingStructure {
            mode,
            buy_in: Chips(read_u64("POKER_BUY_IN", 1_000)),
            blind_ratio,
            max_buy_in_ratio: read_u32("POKER_MAX_BUY_IN_RATIO", 1),
            ante_ratio,
            level_count: read_u32("POKER_LEVEL_COUNT", BettingStructure::DEFAULT_LEVEL_COUNT),
        };

        let rebuy = RebuyPolicy {
            max_rebuys: RebuyLimit::from_raw(read_i64("POKER_MAX_REBUYS", 0)),
            max_rebuy_level: RebuyLimit::from_raw(read_i64("POKER_MAX_REBUY_LEVEL", -1)),
            max_chips_for_rebuy: RebuyLimit::from_raw(read_i64("POKER_MAX_CHIPS_FOR_REBUY", 0)),
        };

        let defaults = GameSettings::default();
        let settings = GameSettings {
            min_players: read_usize("POKER_MIN_PLAYERS", defaults.min_players),
            start_game_after: read_ms("POKER_START_AFTER_MS", defaults.start_game_after.as_millis() as u64),
            start_delay: read_ms("POKER_START_DELAY_MS", 1_000),
            poll_interval: read_ms("POKER_POLL_MS", defaults.poll_interval.as_millis() as u64),
            level_duration: read_ms("POKER_LEVEL_MS", 2_000),
            hand_pause: read_ms("POKER_HAND_PAUSE_MS", 50),
        };

        Self {
            tables: read_usize("POKER_TABLES", 3),
            players_per_table: read_usize("POKER_PLAYERS_PER_TABLE", 6),
            max_seats: read_usize("POKER_MAX_SEATS", 9),
            betting,
            rebuy,
            buy_in_price: Money::from_cents(read_u64("POKER_BUY_IN_PRICE_CENTS", 1_000)),
            starting_balance: Money::from_cents(read_u64("POKER_STARTING_BALANCE_CENTS", 5_000)),
            settings,
            seed: lookup("POKER_SEED").and_then(|raw| raw.trim().parse().ok()),
        }
    }
}
