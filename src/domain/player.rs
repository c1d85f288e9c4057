use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::ledger::PlayerLedger;
use crate::domain::money::Money;
use crate::domain::PlayerId;

/// Игрок вне конкретного стола: профиль + банк.
/// Разделяется между столами и внешними сервисами через `Arc<Player>`.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub bank: PlayerLedger,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, initial_balance: Money) -> Self {
        Self {
            id,
            name: name.into(),
            bank: PlayerLedger::new(initial_balance),
        }
    }
}

/// Статус игрока в контексте стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Участвует в игре.
    Active,
    /// Сбросил карты в текущей раздаче (в игре остаётся).
    Folded,
    /// Весь стек в банке.
    AllIn,
    /// Сидит за столом, но пропускает раздачи.
    SittingOut,
    /// Фишки закончились.
    Busted,
}

/// Занятое место за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTable {
    pub player_id: PlayerId,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Сколько внесено в текущем раунде (блайнды, анте, ставки).
    pub current_bet: Chips,
    pub status: PlayerStatus,
    pub pocket_cards: Vec<Card>,
    /// Сколько ребаев уже сделано на этом месте.
    pub rebuys: u32,
}

impl PlayerAtTable {
    pub fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            current_bet: Chips::ZERO,
            status: PlayerStatus::Active,
            pocket_cards: Vec::new(),
            rebuys: 0,
        }
    }

    /// Включён ли игрок в игру (не sit out и не вылетел).
    pub fn is_participating_game(&self) -> bool {
        !matches!(self.status, PlayerStatus::SittingOut | PlayerStatus::Busted)
    }

    pub fn has_stake(&self) -> bool {
        !self.stack.is_zero()
    }

    /// Может ли место получить карты в следующем раунде.
    pub fn is_ready(&self) -> bool {
        self.is_participating_game() && self.has_stake()
    }

    /// Принудительная ставка. Если фишек не хватает — олл-ин на остаток.
    /// Возвращает реально внесённую сумму.
    pub fn force_bet(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        if self.stack.is_zero() && !paid.is_zero() {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    pub fn clear_pocket(&mut self) {
        self.pocket_cards.clear();
    }
}
