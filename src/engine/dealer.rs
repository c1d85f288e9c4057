//! Розыгрыш стартовой кнопки: каждому претенденту по одной карте, старшая карта побеждает.
//!
//! Карты сравниваются по рангу, равные ранги — по масти, поэтому среди карт одной
//! колоды победитель всегда один. Цикл всё равно повторяется до единственного
//! претендента: колода может содержать повторы (тестовые/нестандартные колоды).

use tracing::debug;

use crate::domain::card::Card;
use crate::domain::{SeatIndex, Table};
use crate::engine::errors::GameError;
use crate::engine::positions::{collect_ready_seats_from, previous_ready_seat};
use crate::engine::RandomSource;

/// Разыграть кнопку. Возвращает место-победитель.
///
/// Кнопка ставится на место *перед* победителем: старт раунда сдвигает её на одно
/// место вперёд, и первым дилером оказывается именно победитель.
pub fn determine_starting_dealer<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
) -> Result<SeatIndex, GameError> {
    let mut active = collect_ready_seats_from(table, 0);
    if active.is_empty() {
        return Err(GameError::NotEnoughPlayers);
    }

    table.deck.shuffle_cards(rng);

    while active.len() > 1 {
        for &seat in &active {
            if let Some(p) = table.seat_mut(seat) {
                p.clear_pocket();
            }
        }

        if table.deck.card_count() < active.len() {
            table.deck.reset_and_shuffle(rng);
        }

        let mut dealt: Vec<(SeatIndex, Card)> = Vec::with_capacity(active.len());
        for &seat in &active {
            let card = table.deck.deal_card().ok_or(GameError::DeckExhausted)?;
            if let Some(p) = table.seat_mut(seat) {
                p.pocket_cards.push(card);
            }
            dealt.push((seat, card));
        }

        // Первый проход ищет максимум, второй отсеивает.
        let best = match dealt.iter().map(|(_, card)| *card).max() {
            Some(card) => card,
            None => return Err(GameError::NotEnoughPlayers),
        };
        active.retain(|seat| {
            dealt
                .iter()
                .any(|(s, card)| s == seat && *card >= best)
        });

        debug!(table_id = table.id, %best, remaining = active.len(), "dealer draw");
    }

    let winner = active[0];
    for seat in collect_ready_seats_from(table, 0) {
        if let Some(p) = table.seat_mut(seat) {
            p.clear_pocket();
        }
    }

    table.dealer_button = previous_ready_seat(table, winner);
    Ok(winner)
}
