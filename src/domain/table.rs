use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::player::PlayerAtTable;
use crate::domain::rules::ConfigError;
use crate::domain::TableId;
use crate::engine::errors::GameError;
use crate::engine::pot::Pot;

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Основное состояние стола. Меняется только игровым циклом этого стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,

    /// Места за столом: индекс вектора = SeatIndex, None — место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    pub deck: Deck,
    pub pot: Pot,

    /// Кнопка дилера; None, пока её не разыграли.
    pub dealer_button: Option<SeatIndex>,
    /// Места блайндов текущего раунда.
    pub small_blind_seat: Option<SeatIndex>,
    pub big_blind_seat: Option<SeatIndex>,
}

impl Table {
    pub const MAX_SEATS: usize = 10;

    pub fn new(id: TableId, name: impl Into<String>, max_seats: usize) -> Result<Self, ConfigError> {
        if !(2..=Self::MAX_SEATS).contains(&max_seats) {
            return Err(ConfigError::InvalidSeatCount {
                got: max_seats,
                max: Self::MAX_SEATS,
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            seats: vec![None; max_seats],
            deck: Deck::standard_52(),
            pot: Pot::new(),
            dealer_button: None,
            small_blind_seat: None,
            big_blind_seat: None,
        })
    }

    pub fn max_seats(&self) -> usize {
        self.seats.len()
    }

    pub fn taken_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Сколько мест ещё держат фишки.
    pub fn seats_with_stakes_count(&self) -> usize {
        self.seats
            .iter()
            .flatten()
            .filter(|p| p.has_stake())
            .count()
    }

    /// Места, которые получат карты в следующем раунде.
    pub fn ready_seats_count(&self) -> usize {
        self.seats.iter().flatten().filter(|p| p.is_ready()).count()
    }

    pub fn seat(&self, index: SeatIndex) -> Option<&PlayerAtTable> {
        self.seats.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, index: SeatIndex) -> Option<&mut PlayerAtTable> {
        self.seats.get_mut(index as usize).and_then(|s| s.as_mut())
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seat(index).is_none()
    }

    pub fn sit_down(&mut self, index: SeatIndex, occupant: PlayerAtTable) -> Result<(), GameError> {
        if self
            .seats
            .iter()
            .flatten()
            .any(|p| p.player_id == occupant.player_id)
        {
            return Err(GameError::AlreadySeated(occupant.player_id));
        }

        let slot = self
            .seats
            .get_mut(index as usize)
            .ok_or(GameError::InvalidSeat(index))?;
        if slot.is_some() {
            return Err(GameError::SeatTaken(index));
        }
        *slot = Some(occupant);
        Ok(())
    }

    /// Освободить место. Возвращает того, кто там сидел.
    pub fn leave(&mut self, index: SeatIndex) -> Result<PlayerAtTable, GameError> {
        let slot = self
            .seats
            .get_mut(index as usize)
            .ok_or(GameError::InvalidSeat(index))?;
        slot.take().ok_or(GameError::EmptySeat(index))
    }

    /// Все фишки на столе: стеки + банк.
    pub fn total_chips(&self) -> Chips {
        self.seats
            .iter()
            .flatten()
            .map(|p| p.stack)
            .sum::<Chips>()
            + self.pot.total
    }
}
