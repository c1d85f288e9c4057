use crate::domain::{PlayerId, SeatIndex, TableId};

use thiserror::Error;

/// Ошибки игрового цикла стола.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} пустое")]
    EmptySeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatTaken(SeatIndex),

    #[error("Игрок {0} уже сидит за этим столом")]
    AlreadySeated(PlayerId),

    #[error("Недостаточно активных игроков для раунда")]
    NotEnoughPlayers,

    /// Колода пуста там, где её должны были пересобрать: ошибка вызывающего кода.
    #[error("Колода пуста: стол/колода не были сброшены перед сдачей")]
    DeckExhausted,

    #[error("Игровой цикл стола уже завершён")]
    TableClosed,

    #[error("Ошибка розыгрыша раздачи: {0}")]
    Driver(String),

    #[error("Задача стола завершилась аварийно: {0}")]
    TaskFailed(String),
}
