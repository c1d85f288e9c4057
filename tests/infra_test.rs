// tests/infra_test.rs

use std::collections::HashMap;
use std::time::Duration;

use poker_table_engine::domain::{
    BettingStructure, BlindRatio, Chips, GameMode, Money, RebuyLimit, RuleSet,
};
use poker_table_engine::infra::{IdGenerator, SimulationConfig};

fn config_from(pairs: &[(&str, &str)]) -> SimulationConfig {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SimulationConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn id_generator_is_monotonic_from_one() {
    let ids = IdGenerator::new();
    assert_eq!(ids.next_table_id(), 1);
    assert_eq!(ids.next_table_id(), 2);
    assert_eq!(ids.next_player_id(), 1);
    assert_eq!(ids.next_player_id(), 2);
    assert_eq!(ids.next_table_id(), 3);
}

#[test]
fn empty_environment_gives_playable_defaults() {
    let config = config_from(&[]);

    assert_eq!(config.betting.mode, GameMode::Tournament);
    assert_eq!(config.betting.buy_in, Chips(1000));
    assert_eq!(config.betting.blind_ratio, BlindRatio::OneTo80);
    assert_eq!(config.seed, None);

    let rules = RuleSet::new(config.betting.clone(), config.rebuy, config.buy_in_price).unwrap();
    assert_eq!(rules.opening_level().small_blind, Chips(20));
    config.settings.validate().unwrap();
}

#[test]
fn environment_overrides_are_applied() {
    let config = config_from(&[
        ("POKER_MODE", "cash"),
        ("POKER_BUY_IN", "2000"),
        ("POKER_BLIND_RATIO", "10"),
        ("POKER_MAX_REBUYS", "-1"),
        ("POKER_MAX_CHIPS_FOR_REBUY", "250"),
        ("POKER_BUY_IN_PRICE_CENTS", "2550"),
        ("POKER_TABLES", "5"),
        ("POKER_HAND_PAUSE_MS", "0"),
        ("POKER_SEED", "99"),
    ]);

    assert_eq!(config.betting.mode, GameMode::Cash);
    assert_eq!(config.betting.buy_in, Chips(2000));
    assert_eq!(config.betting.blind_ratio, BlindRatio::OneTo10);
    assert_eq!(config.rebuy.max_rebuys, RebuyLimit::Unlimited);
    assert_eq!(config.rebuy.max_chips_for_rebuy, RebuyLimit::AtMost(250));
    assert_eq!(config.buy_in_price, Money::new(25, 50));
    assert_eq!(config.tables, 5);
    assert_eq!(config.settings.hand_pause, Duration::ZERO);
    assert_eq!(config.seed, Some(99));
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let config = config_from(&[
        ("POKER_BLIND_RATIO", "7"),
        ("POKER_BUY_IN", "lots"),
        ("POKER_MAX_REBUYS", "many"),
        ("POKER_SEED", "-3"),
    ]);

    assert_eq!(config.betting.blind_ratio, BlindRatio::OneTo80);
    assert_eq!(config.betting.buy_in, Chips(1000));
    assert_eq!(config.rebuy.max_rebuys, RebuyLimit::AtMost(0));
    assert_eq!(config.seed, None);
}

#[test]
fn out_of_range_counts_fall_back_to_defaults() {
    let config = config_from(&[
        ("POKER_LEVEL_COUNT", "4294967296"),
        ("POKER_MAX_BUY_IN_RATIO", "4294967297"),
        ("POKER_TABLES", "18446744073709551616"),
    ]);

    assert_eq!(config.betting.level_count, BettingStructure::DEFAULT_LEVEL_COUNT);
    assert_eq!(config.betting.max_buy_in_ratio, 1);
    assert_eq!(config.tables, 3);
    RuleSet::new(config.betting, config.rebuy, config.buy_in_price).unwrap();
}
