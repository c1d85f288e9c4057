use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::PlayerStatus;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::game::Game;
use crate::engine::lifecycle::LifecyclePhase;

/// Место в снапшоте.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub stack: Chips,
    pub status: PlayerStatus,
    pub rebuys: u32,
}

/// Снимок стола, который цикл публикует после каждого перехода.
/// Читатели (лобби, UI, мониторинг) получают его через `watch`-канал.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub table_id: TableId,
    pub phase: LifecyclePhase,
    pub rounds_played: u64,
    pub game_length_secs: u64,
    pub level: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub dealer_button: Option<SeatIndex>,
    pub pot: Chips,
    pub seats: Vec<SeatSnapshot>,
}

impl GameSnapshot {
    pub fn capture(game: &Game, phase: LifecyclePhase) -> Self {
        let level = &game.current_blind_level;
        let seats = game
            .table
            .seats
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref().map(|p| SeatSnapshot {
                    seat: idx as SeatIndex,
                    player_id: p.player_id,
                    stack: p.stack,
                    status: p.status,
                    rebuys: p.rebuys,
                })
            })
            .collect();

        Self {
            table_id: game.table.id,
            phase,
            rounds_played: game.rounds_played(),
            game_length_secs: game.game_length().as_secs(),
            level: level.level,
            small_blind: level.small_blind,
            big_blind: level.big_blind,
            ante: level.ante,
            dealer_button: game.table.dealer_button,
            pot: game.table.pot.total,
            seats,
        }
    }

    /// Сумма фишек на столе (стеки + банк).
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().map(|s| s.stack).sum::<Chips>() + self.pot
    }
}
