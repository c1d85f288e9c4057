//! `Game`: состояние одной игровой сессии стола и синхронные шаги раунда.
//!
//! Асинхронный цикл (`lifecycle`) только решает, *когда* вызывать эти шаги.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::ledger::PlayerLedger;
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::domain::rules::{ConfigError, GameMode, GameSettings, RuleSet};
use crate::domain::table::Table;
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::dealer::determine_starting_dealer;
use crate::engine::errors::GameError;
use crate::engine::forced_bets::enforce_forced_bets;
use crate::engine::positions::{blind_seats, next_dealer};
use crate::engine::RandomSource;

/// Что известно о раунде сразу после обязательных ставок.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStart {
    /// Номер раунда, с 1.
    pub round: u64,
    pub level: BlindLevel,
    pub dealer: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    /// Сколько нужно поставить, чтобы уравнять: BB (+ ante).
    pub initial_call: Chips,
}

/// Итог раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSettlement {
    /// Игроки, снятые со стола (турнир, стек = 0).
    pub eliminated: Vec<PlayerId>,
    /// Фишки, которые драйвер раздачи оставил в банке.
    pub pot_left: Chips,
    pub game_over: bool,
}

#[derive(Debug)]
pub struct Game {
    rules: Arc<RuleSet>,
    settings: GameSettings,
    pub table: Table,
    /// Уровень, применённый в последнем раунде (до первого раунда — уровень 1).
    pub current_blind_level: BlindLevel,
    /// Игровое время с начала первого раунда. Не убывает.
    game_length: Duration,
    rounds_played: u64,
}

impl Game {
    pub fn new(rules: Arc<RuleSet>, table: Table, settings: GameSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let current_blind_level = rules.opening_level();

        Ok(Self {
            rules,
            settings,
            table,
            current_blind_level,
            game_length: Duration::ZERO,
            rounds_played: 0,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn game_length(&self) -> Duration {
        self.game_length
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    /// Хватает ли готовых мест для раунда.
    pub fn has_enough_players(&self) -> bool {
        self.table.ready_seats_count() >= self.settings.min_players
    }

    /// Игра окончена, когда фишки остались меньше чем у двух мест.
    /// Время и число раздач роли не играют.
    pub fn check_end_game(&self) -> bool {
        self.table.seats_with_stakes_count() < 2
    }

    /// Уровень для заданного игрового времени.
    pub fn level_for(&self, elapsed: Duration) -> BlindLevel {
        self.rules
            .schedule()
            .level_for_elapsed(elapsed, self.settings.level_duration)
            .cloned()
            .unwrap_or_else(|| self.rules.opening_level())
    }

    pub fn determine_dealer<R: RandomSource>(&mut self, rng: &mut R) -> Result<SeatIndex, GameError> {
        let winner = determine_starting_dealer(&mut self.table, rng)?;
        info!(
            table_id = self.table.id,
            winner,
            button = ?self.table.dealer_button,
            "starting dealer determined"
        );
        Ok(winner)
    }

    /// Старт раунда: уровень по времени, сдвиг кнопки, места блайндов,
    /// свежая колода и обязательные ставки.
    pub fn begin_round<R: RandomSource>(
        &mut self,
        rng: &mut R,
        elapsed: Duration,
    ) -> Result<RoundStart, GameError> {
        if self.table.ready_seats_count() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }

        self.game_length = self.game_length.max(elapsed);
        let level = self.level_for(self.game_length);

        for p in self.table.seats.iter_mut().flatten() {
            p.current_bet = Chips::ZERO;
            p.clear_pocket();
            if matches!(p.status, PlayerStatus::Folded | PlayerStatus::AllIn) && p.has_stake() {
                p.status = PlayerStatus::Active;
            }
        }

        let dealer = next_dealer(&self.table).ok_or(GameError::NotEnoughPlayers)?;
        let (small_blind_seat, big_blind_seat) =
            blind_seats(&self.table, dealer).ok_or(GameError::NotEnoughPlayers)?;
        self.table.dealer_button = Some(dealer);
        self.table.small_blind_seat = Some(small_blind_seat);
        self.table.big_blind_seat = Some(big_blind_seat);
        self.table.deck.reset_and_shuffle(rng);

        if level.level != self.current_blind_level.level {
            info!(
                table_id = self.table.id,
                from = self.current_blind_level.level,
                to = level.level,
                small_blind = %level.small_blind,
                big_blind = %level.big_blind,
                ante = %level.ante,
                "blind level advanced"
            );
        }

        let initial_call = enforce_forced_bets(self, &level);
        self.rounds_played += 1;

        info!(
            table_id = self.table.id,
            round = self.rounds_played,
            level = level.level,
            dealer,
            small_blind_seat,
            big_blind_seat,
            %initial_call,
            "round started"
        );

        Ok(RoundStart {
            round: self.rounds_played,
            level,
            dealer,
            small_blind_seat,
            big_blind_seat,
            initial_call,
        })
    }

    /// Закрыть раунд: сбросить ставки и карты, пометить вылетевших.
    /// В турнире вылетевший остаётся на месте (`Busted`), пока политика
    /// ещё разрешает ему ребай; иначе место освобождается.
    pub fn settle_round(&mut self) -> RoundSettlement {
        let tournament = self.rules.mode() == GameMode::Tournament;
        let policy = *self.rules.rebuy_policy();
        let level = self.level_for(self.game_length).level;
        let mut eliminated = Vec::new();

        for slot in self.table.seats.iter_mut() {
            let Some(p) = slot.as_mut() else { continue };
            p.current_bet = Chips::ZERO;
            p.clear_pocket();

            if !p.has_stake() && p.status != PlayerStatus::SittingOut {
                p.status = PlayerStatus::Busted;
            } else if matches!(p.status, PlayerStatus::Folded | PlayerStatus::AllIn) {
                p.status = PlayerStatus::Active;
            }

            if tournament
                && p.status == PlayerStatus::Busted
                && !policy.can_rebuy(p.rebuys, level, Chips::ZERO)
            {
                eliminated.push(p.player_id);
                *slot = None;
            }
        }

        self.table.small_blind_seat = None;
        self.table.big_blind_seat = None;

        let pot_left = self.table.pot.total;
        if !pot_left.is_zero() {
            warn!(table_id = self.table.id, %pot_left, "pot not awarded by hand driver, carried over");
        }
        for player_id in &eliminated {
            info!(table_id = self.table.id, player_id, "player eliminated");
        }

        RoundSettlement {
            eliminated,
            pot_left,
            game_over: self.check_end_game(),
        }
    }

    /// Посадить игрока со стеком.
    pub fn seat_player(&mut self, seat: SeatIndex, player_id: PlayerId, stack: Chips) -> Result<(), GameError> {
        self.table.sit_down(seat, PlayerAtTable::new(player_id, stack))?;
        info!(table_id = self.table.id, seat, player_id, %stack, "player seated");
        Ok(())
    }

    /// Уйти со стола, забрав стек.
    pub fn unseat_player(&mut self, seat: SeatIndex) -> Result<Chips, GameError> {
        let occupant = self.table.leave(seat)?;
        info!(table_id = self.table.id, seat, player_id = occupant.player_id, "player left");
        Ok(occupant.stack)
    }

    /// Ребай: политика стола + списание цены бай-ина с банка игрока.
    /// Лимит уровня проверяется по уровню на момент `elapsed` игрового времени
    /// (часы не идут назад, см. `game_length`).
    /// `false`: ребай не разрешён или денег не хватило (банк при этом не тронут).
    pub fn try_rebuy(&mut self, seat: SeatIndex, bank: &PlayerLedger, elapsed: Duration) -> bool {
        let level = self.level_for(self.game_length.max(elapsed)).level;
        let policy = *self.rules.rebuy_policy();
        let price = self.rules.buy_in_price();
        let chips = self.rules.buy_in();
        let table_id = self.table.id;

        let Some(p) = self.table.seat_mut(seat) else {
            return false;
        };
        if !policy.can_rebuy(p.rebuys, level, p.stack) {
            return false;
        }
        if !bank.try_remove_funds(price) {
            return false;
        }

        p.stack += chips;
        p.rebuys += 1;
        if p.status == PlayerStatus::Busted {
            p.status = PlayerStatus::Active;
        }
        info!(table_id, seat, rebuys = p.rebuys, %price, "rebuy");
        true
    }
}
