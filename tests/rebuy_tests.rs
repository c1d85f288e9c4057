// tests/rebuy_tests.rs

use std::sync::Arc;
use std::time::Duration;

use poker_table_engine::domain::{
    AnteRatio, BettingStructure, BlindRatio, Chips, GameSettings, Money, Player, PlayerStatus,
    RebuyLimit, RebuyPolicy, RuleSet, Table,
};
use poker_table_engine::engine::Game;
use poker_table_engine::infra::DeterministicRng;

const MINUTE: Duration = Duration::from_secs(60);

fn limited() -> RebuyPolicy {
    RebuyPolicy {
        max_rebuys: RebuyLimit::AtMost(2),
        max_rebuy_level: RebuyLimit::AtMost(3),
        max_chips_for_rebuy: RebuyLimit::AtMost(500),
    }
}

#[test]
fn predicate_checks_all_three_limits() {
    let policy = limited();

    assert!(policy.can_rebuy(0, 1, Chips::ZERO));
    assert!(policy.can_rebuy(1, 3, Chips(500)));

    assert!(!policy.can_rebuy(2, 1, Chips::ZERO), "rebuy count is a strict limit");
    assert!(!policy.can_rebuy(0, 4, Chips::ZERO), "level limit is inclusive");
    assert!(!policy.can_rebuy(0, 1, Chips(501)), "chip limit is inclusive");
}

#[test]
fn unlimited_sentinel_always_passes() {
    assert_eq!(RebuyLimit::from_raw(-1), RebuyLimit::Unlimited);
    assert_eq!(RebuyLimit::from_raw(0), RebuyLimit::AtMost(0));
    assert_eq!(RebuyLimit::from_raw(7), RebuyLimit::AtMost(7));

    let policy = RebuyPolicy::unlimited();
    assert!(policy.can_rebuy(u32::MAX, u32::MAX, Chips(u64::MAX)));

    let mixed = RebuyPolicy {
        max_rebuys: RebuyLimit::from_raw(-1),
        max_rebuy_level: RebuyLimit::AtMost(2),
        max_chips_for_rebuy: RebuyLimit::from_raw(-1),
    };
    assert!(mixed.can_rebuy(1_000, 2, Chips(1_000_000)));
    assert!(!mixed.can_rebuy(0, 3, Chips::ZERO));
}

#[test]
fn disabled_policy_never_allows() {
    assert!(!RebuyPolicy::disabled().can_rebuy(0, 1, Chips::ZERO));
}

fn cash_game(policy: RebuyPolicy) -> Game {
    let rules = Arc::new(
        RuleSet::new(
            BettingStructure::cash(Chips(1000), BlindRatio::OneTo10),
            policy,
            Money::new(10, 0),
        )
        .unwrap(),
    );
    let table = Table::new(9, "Rebuys", 4).unwrap();
    let mut game = Game::new(rules, table, GameSettings::default()).unwrap();
    game.seat_player(0, 1, Chips::ZERO).unwrap();
    game.seat_player(1, 2, Chips(2000)).unwrap();
    game.table.seat_mut(0).unwrap().status = PlayerStatus::Busted;
    game
}

#[test]
fn rebuy_debits_bank_and_restores_stack() {
    let policy = RebuyPolicy {
        max_rebuys: RebuyLimit::AtMost(1),
        max_rebuy_level: RebuyLimit::Unlimited,
        max_chips_for_rebuy: RebuyLimit::AtMost(0),
    };
    let mut game = cash_game(policy);
    let player = Arc::new(Player::new(1, "alice", Money::new(25, 0)));

    assert!(game.try_rebuy(0, &player.bank, Duration::ZERO));
    let seat = game.table.seat(0).unwrap();
    assert_eq!(seat.stack, Chips(1000));
    assert_eq!(seat.rebuys, 1);
    assert_eq!(seat.status, PlayerStatus::Active);
    assert_eq!(player.bank.balance(), Money::new(15, 0));

    // Стек больше лимита: отказ, банк не тронут.
    assert!(!game.try_rebuy(0, &player.bank, Duration::ZERO));
    assert_eq!(player.bank.balance(), Money::new(15, 0));

    // Снова пусто, но лимит ребаев исчерпан.
    let seat = game.table.seat_mut(0).unwrap();
    seat.stack = Chips::ZERO;
    seat.status = PlayerStatus::Busted;
    assert!(!game.try_rebuy(0, &player.bank, Duration::ZERO));
    assert_eq!(player.bank.balance(), Money::new(15, 0));
    assert_eq!(game.table.seat(0).unwrap().stack, Chips::ZERO);
}

#[test]
fn rebuy_without_funds_is_refused() {
    let mut game = cash_game(RebuyPolicy::unlimited());
    let player = Player::new(1, "bob", Money::new(5, 0));

    assert!(!game.try_rebuy(0, &player.bank, Duration::ZERO));
    assert_eq!(player.bank.balance(), Money::new(5, 0));

    let seat = game.table.seat(0).unwrap();
    assert_eq!(seat.stack, Chips::ZERO);
    assert_eq!(seat.rebuys, 0);
    assert_eq!(seat.status, PlayerStatus::Busted);
}

#[test]
fn rebuy_on_empty_seat_is_refused() {
    let mut game = cash_game(RebuyPolicy::unlimited());
    let player = Player::new(3, "carol", Money::new(50, 0));

    assert!(!game.try_rebuy(3, &player.bank, Duration::ZERO));
    assert!(!game.try_rebuy(42, &player.bank, Duration::ZERO));
    assert_eq!(player.bank.balance(), Money::new(50, 0));
}

fn tournament_game(policy: RebuyPolicy) -> Game {
    let rules = Arc::new(
        RuleSet::new(
            BettingStructure::tournament(Chips(1000), BlindRatio::OneTo80, 1, AnteRatio::OneTo5),
            policy,
            Money::new(10, 0),
        )
        .unwrap(),
    );
    let table = Table::new(10, "Freezeout", 6).unwrap();
    let settings = GameSettings {
        level_duration: 10 * MINUTE,
        ..GameSettings::default()
    };
    let mut game = Game::new(rules, table, settings).unwrap();
    for seat in 0..3 {
        game.seat_player(seat, 10 + seat as u64, Chips(1000)).unwrap();
    }
    game
}

/// Раунд, после которого у места 0 не осталось фишек.
fn bust_seat_zero(game: &mut Game, elapsed: Duration) {
    game.begin_round(&mut DeterministicRng::from_seed(4), elapsed).unwrap();
    let pot = game.table.pot.take();
    game.table.seat_mut(1).unwrap().stack += pot;
    let busted = game.table.seat_mut(0).unwrap();
    let rest = busted.stack;
    busted.stack = Chips::ZERO;
    game.table.seat_mut(2).unwrap().stack += rest;
}

#[test]
fn busted_tournament_player_keeps_seat_while_rebuy_is_possible() {
    let mut game = tournament_game(RebuyPolicy::unlimited());
    let player = Player::new(10, "erin", Money::new(30, 0));
    bust_seat_zero(&mut game, Duration::ZERO);

    let settlement = game.settle_round();
    assert!(settlement.eliminated.is_empty());
    assert!(!settlement.game_over);
    assert_eq!(game.table.seat(0).unwrap().status, PlayerStatus::Busted);

    assert!(game.try_rebuy(0, &player.bank, Duration::ZERO));
    let seat = game.table.seat(0).unwrap();
    assert_eq!(seat.stack, Chips(1000));
    assert_eq!(seat.status, PlayerStatus::Active);
    assert_eq!(player.bank.balance(), Money::new(20, 0));
}

#[test]
fn busted_tournament_player_leaves_once_rebuys_run_out() {
    let policy = RebuyPolicy {
        max_rebuys: RebuyLimit::Unlimited,
        max_rebuy_level: RebuyLimit::AtMost(1),
        max_chips_for_rebuy: RebuyLimit::Unlimited,
    };

    let mut early = tournament_game(policy);
    bust_seat_zero(&mut early, 5 * MINUTE);
    assert!(early.settle_round().eliminated.is_empty());

    let mut late = tournament_game(policy);
    bust_seat_zero(&mut late, 15 * MINUTE);
    assert_eq!(late.settle_round().eliminated, vec![10]);
    assert!(late.table.is_seat_empty(0));
}

#[test]
fn rebuy_level_follows_elapsed_game_time() {
    let policy = RebuyPolicy {
        max_rebuys: RebuyLimit::Unlimited,
        max_rebuy_level: RebuyLimit::AtMost(1),
        max_chips_for_rebuy: RebuyLimit::Unlimited,
    };
    let mut game = tournament_game(policy);
    let player = Player::new(10, "dave", Money::new(100, 0));
    bust_seat_zero(&mut game, 5 * MINUTE);
    game.settle_round();
    assert_eq!(game.current_blind_level.level, 1);

    // Граница уровня пройдена между раундами: ребай уже по второму уровню.
    assert!(!game.try_rebuy(0, &player.bank, 12 * MINUTE));
    assert_eq!(player.bank.balance(), Money::new(100, 0));

    assert!(game.try_rebuy(0, &player.bank, 9 * MINUTE));
    assert_eq!(player.bank.balance(), Money::new(90, 0));
}
