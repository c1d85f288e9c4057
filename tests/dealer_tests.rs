// tests/dealer_tests.rs
//
// Розыгрыш кнопки на подготовленных колодах: RNG ничего не перемешивает,
// поэтому карты сдаются с конца вектора в порядке мест.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use poker_table_engine::domain::{
    BettingStructure, BlindRatio, Card, Chips, Deck, GameSettings, Money, PlayerAtTable,
    PlayerStatus, RebuyPolicy, RuleSet, SeatIndex, Table,
};
use poker_table_engine::engine::{determine_starting_dealer, Game, GameError, RandomSource};

/// "Перемешивание", которое оставляет порядок как есть.
struct StackedRng;

impl RandomSource for StackedRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn card(s: &str) -> Card {
    Card::from_str(s).unwrap()
}

/// Колода, из которой карты выходят ровно в порядке `order`.
fn deck_dealing(order: &[&str]) -> Deck {
    Deck::from_cards(order.iter().rev().map(|s| card(s)).collect())
}

fn table_with(seats: &[SeatIndex]) -> Table {
    let mut table = Table::new(1, "Draw", 6).unwrap();
    for &seat in seats {
        table
            .sit_down(seat, PlayerAtTable::new(10 + seat as u64, Chips(1000)))
            .unwrap();
    }
    table
}

#[test]
fn highest_card_wins_and_button_sits_before_winner() {
    let mut table = table_with(&[0, 2, 4]);
    table.deck = deck_dealing(&["Kh", "As", "2c"]);

    let winner = determine_starting_dealer(&mut table, &mut StackedRng).unwrap();

    assert_eq!(winner, 2);
    assert_eq!(table.dealer_button, Some(0));
    for p in table.seats.iter().flatten() {
        assert!(p.pocket_cards.is_empty());
    }
}

#[test]
fn equal_ranks_are_split_by_suit() {
    let mut table = table_with(&[1, 3]);
    table.deck = deck_dealing(&["As", "Ah"]);

    let winner = determine_starting_dealer(&mut table, &mut StackedRng).unwrap();

    assert_eq!(winner, 1);
    assert_eq!(table.dealer_button, Some(3));
}

#[test]
fn duplicated_top_card_forces_another_draw() {
    let mut table = table_with(&[0, 1, 2]);
    table.deck = deck_dealing(&["As", "As", "2c", "3c", "Kd"]);

    let winner = determine_starting_dealer(&mut table, &mut StackedRng).unwrap();

    assert_eq!(winner, 1);
    assert_eq!(table.dealer_button, Some(0));
}

#[test]
fn short_deck_is_rebuilt_before_dealing() {
    let mut table = table_with(&[0, 1, 2]);
    table.deck = deck_dealing(&["Ac"]);

    let winner = determine_starting_dealer(&mut table, &mut StackedRng).unwrap();

    // Свежая колода без перемешивания сдаёт сверху As, Ks, Qs.
    assert_eq!(winner, 0);
    assert_eq!(table.dealer_button, Some(2));
    assert_eq!(table.deck.card_count(), 52 - 3);
}

#[test]
fn busted_and_sitting_out_seats_do_not_draw() {
    let mut table = table_with(&[0, 1, 2, 3]);
    table.seat_mut(0).unwrap().status = PlayerStatus::SittingOut;
    table.seat_mut(3).unwrap().stack = Chips::ZERO;
    table.deck = deck_dealing(&["5d", "9d"]);

    let winner = determine_starting_dealer(&mut table, &mut StackedRng).unwrap();

    assert_eq!(winner, 2);
    assert_eq!(table.dealer_button, Some(1));
}

#[test]
fn empty_table_cannot_draw() {
    let mut table = table_with(&[]);
    assert_eq!(
        determine_starting_dealer(&mut table, &mut StackedRng),
        Err(GameError::NotEnoughPlayers)
    );
}

#[test]
fn draw_winner_deals_the_first_round() {
    let rules = Arc::new(
        RuleSet::new(
            BettingStructure::cash(Chips(1000), BlindRatio::OneTo10),
            RebuyPolicy::disabled(),
            Money::new(10, 0),
        )
        .unwrap(),
    );
    let mut table = table_with(&[0, 1, 2, 3]);
    table.deck = deck_dealing(&["3h", "Td", "Jc", "4s"]);
    let mut game = Game::new(rules, table, GameSettings::default()).unwrap();

    let winner = game.determine_dealer(&mut StackedRng).unwrap();
    assert_eq!(winner, 2);

    let round = game.begin_round(&mut StackedRng, Duration::ZERO).unwrap();
    assert_eq!(round.dealer, 2);
    assert_eq!(round.small_blind_seat, 3);
    assert_eq!(round.big_blind_seat, 0);
    assert_eq!(game.table.dealer_button, Some(2));
}
