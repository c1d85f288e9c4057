use tracing::debug;

use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::SeatIndex;
use crate::engine::game::Game;

/// Постинг обязательных ставок раунда:
/// small blind → big blind → анте со всех участвующих мест по порядку стола.
///
/// Места блайндов стол уже назначил (`small_blind_seat`/`big_blind_seat`).
/// Нехватку фишек не проверяем: `force_bet` сам уводит игрока в олл-ин.
///
/// Возвращает стартовую сумму для колла: BB, либо BB + ante, если анте есть.
pub fn enforce_forced_bets(game: &mut Game, level: &BlindLevel) -> Chips {
    game.current_blind_level = level.clone();

    let small_seat = game.table.small_blind_seat;
    let big_seat = game.table.big_blind_seat;

    for (seat, amount) in [(small_seat, level.small_blind), (big_seat, level.big_blind)] {
        if let Some(seat) = seat {
            force_from_seat(game, seat, amount);
        }
    }

    if !level.has_ante() {
        return level.big_blind;
    }

    let seat_count = game.table.max_seats();
    for idx in 0..seat_count {
        let participating = game
            .table
            .seat(idx as SeatIndex)
            .map(|p| p.is_participating_game())
            .unwrap_or(false);
        if participating {
            force_from_seat(game, idx as SeatIndex, level.ante);
        }
    }

    level.big_blind + level.ante
}

fn force_from_seat(game: &mut Game, seat: SeatIndex, amount: Chips) {
    let table = &mut game.table;
    let paid = match table.seat_mut(seat) {
        Some(player) => player.force_bet(amount),
        None => return,
    };
    table.pot.add(paid);
    debug!(table_id = table.id, seat, %amount, %paid, "forced bet");
}
