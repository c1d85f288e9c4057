//! Игровой движок стола: расписание блайндов, обязательные ставки,
//! розыгрыш кнопки и асинхронный жизненный цикл.
//!
//! Высокоуровневые объекты:
//!   - `Game`: состояние сессии стола и синхронные шаги раунда;
//!   - `GameLifecycleController` / `spawn_game`: цикл одного стола;
//!   - `TableSupervisor`: много столов параллельно.

pub mod blind_schedule;
pub mod dealer;
pub mod errors;
pub mod forced_bets;
pub mod game;
pub mod lifecycle;
pub mod positions;
pub mod pot;
pub mod snapshot;
pub mod table_manager;

pub use blind_schedule::build_schedule;
pub use dealer::determine_starting_dealer;
pub use errors::GameError;
pub use forced_bets::enforce_forced_bets;
pub use game::{Game, RoundSettlement, RoundStart};
pub use lifecycle::{
    spawn_game, GameHandle, GameLifecycleController, GameOutcome, GameSummary, HandDriver,
    LifecyclePhase, TableCommand,
};
pub use pot::Pot;
pub use snapshot::{GameSnapshot, SeatSnapshot};
pub use table_manager::TableSupervisor;

/// RNG интерфейс для движка. Реализации в `infra::rng`.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
