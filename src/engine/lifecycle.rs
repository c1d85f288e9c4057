//! Игровой цикл одного стола.
//!
//! Фазы: `AwaitingPlayers → DealerDetermination → RoundActive → RoundSettled →
//! (AwaitingPlayers | GameEnded)`.
//!
//! Цикл является единственным писатель состояния стола. Внешний мир общается с ним
//! командами через `mpsc` и читает снапшоты через `watch`. Приостанавливаемся
//! только в ожидании игроков и в паузах между раундами, ни один замок при этом
//! не удерживается. Раунд от старта до расчёта выполняется без `.await`,
//! поэтому отмена никогда не оставляет полупримененный раунд.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error, info};

use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::table::Table;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::errors::GameError;
use crate::engine::game::{Game, RoundStart};
use crate::engine::snapshot::GameSnapshot;
use crate::engine::RandomSource;

const COMMAND_BUFFER: usize = 64;

/// Фаза игрового цикла.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LifecyclePhase {
    AwaitingPlayers,
    DealerDetermination,
    RoundActive,
    RoundSettled,
    GameEnded,
    Cancelled,
}

/// Розыгрыш раздачи после обязательных ставок: торговля, шоудаун, выплата банка.
/// Реализуется снаружи; цикл только вызывает его между стартом и расчётом раунда.
pub trait HandDriver: Send + 'static {
    fn play_hand(&mut self, table: &mut Table, round: &RoundStart) -> Result<(), GameError>;
}

/// Команды игровому циклу.
#[derive(Debug)]
pub enum TableCommand {
    SitDown {
        seat: SeatIndex,
        player_id: PlayerId,
        stack: Chips,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Leave {
        seat: SeatIndex,
        reply: oneshot::Sender<Result<Chips, GameError>>,
    },
    Rebuy {
        seat: SeatIndex,
        player: Arc<Player>,
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSummary {
    pub table_id: TableId,
    pub rounds_played: u64,
    pub final_level: u32,
    pub game_length: Duration,
    /// Единственное место с фишками, если такое есть.
    pub winner: Option<PlayerId>,
    pub final_snapshot: GameSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameOutcome {
    Finished(GameSummary),
    Cancelled { rounds_played: u64 },
}

pub struct GameLifecycleController<R, D> {
    game: Game,
    rng: R,
    driver: D,
    inbox: mpsc::Receiver<TableCommand>,
    snapshots: watch::Sender<GameSnapshot>,
    phase: LifecyclePhase,
    opened_at: Instant,
    started_at: Option<Instant>,
}

impl<R, D> GameLifecycleController<R, D>
where
    R: RandomSource + Send + 'static,
    D: HandDriver,
{
    pub fn new(
        game: Game,
        rng: R,
        driver: D,
        inbox: mpsc::Receiver<TableCommand>,
    ) -> (Self, watch::Receiver<GameSnapshot>) {
        let phase = LifecyclePhase::AwaitingPlayers;
        let (snapshots, receiver) = watch::channel(GameSnapshot::capture(&game, phase));
        let controller = Self {
            game,
            rng,
            driver,
            inbox,
            snapshots,
            phase,
            opened_at: Instant::now(),
            started_at: None,
        };
        (controller, receiver)
    }

    pub async fn run(mut self) -> Result<GameOutcome, GameError> {
        let table_id = self.game.table.id;
        info!(table_id, "table opened");

        match self.run_rounds().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(table_id, %err, "game loop aborted");
                Err(err)
            }
        }
    }

    async fn run_rounds(&mut self) -> Result<GameOutcome, GameError> {
        loop {
            self.set_phase(LifecyclePhase::AwaitingPlayers);
            let pause = if self.game.rounds_played() == 0 {
                self.game.settings().start_delay
            } else {
                self.game.settings().hand_pause
            };

            if !self.await_start(pause).await {
                self.set_phase(LifecyclePhase::Cancelled);
                info!(table_id = self.game.table.id, rounds = self.game.rounds_played(), "table cancelled");
                return Ok(GameOutcome::Cancelled {
                    rounds_played: self.game.rounds_played(),
                });
            }

            if self.game.table.dealer_button.is_none() {
                self.set_phase(LifecyclePhase::DealerDetermination);
                self.game.determine_dealer(&mut self.rng)?;
            }

            self.set_phase(LifecyclePhase::RoundActive);
            let started_at = *self.started_at.get_or_insert_with(Instant::now);
            let round = self.game.begin_round(&mut self.rng, started_at.elapsed())?;
            self.publish();

            self.driver.play_hand(&mut self.game.table, &round)?;

            let settlement = self.game.settle_round();
            self.set_phase(LifecyclePhase::RoundSettled);

            if settlement.game_over {
                self.set_phase(LifecyclePhase::GameEnded);
                let summary = self.summary();
                info!(
                    table_id = summary.table_id,
                    rounds = summary.rounds_played,
                    winner = ?summary.winner,
                    "game ended"
                );
                return Ok(GameOutcome::Finished(summary));
            }
        }
    }

    /// Ждём условий старта раунда. `false` — цикл отменён.
    ///
    /// Условия: наступило время `start_game_after` и готовых мест не меньше минимума.
    /// После паузы `pause` количество мест перепроверяется: кто-то мог уйти.
    async fn await_start(&mut self, pause: Duration) -> bool {
        loop {
            if !self.drain_pending() {
                return false;
            }

            if self.start_conditions_met() {
                if !pause.is_zero() {
                    debug!(table_id = self.game.table.id, ?pause, "start conditions met, waiting");
                    if !self.pump_until(Instant::now() + pause).await {
                        return false;
                    }
                }
                if self.game.has_enough_players() {
                    return true;
                }
                debug!(table_id = self.game.table.id, "players left during start delay");
            }

            let deadline = Instant::now() + self.game.settings().poll_interval;
            if !self.pump_until(deadline).await {
                return false;
            }
        }
    }

    fn start_conditions_met(&self) -> bool {
        Instant::now() >= self.opened_at + self.game.settings().start_game_after
            && self.game.has_enough_players()
    }

    /// Обрабатываем команды до `deadline`. `false` — пришёл Shutdown или все отправители ушли.
    async fn pump_until(&mut self, deadline: Instant) -> bool {
        loop {
            tokio::select! {
                _ = time::sleep_until(deadline) => return true,
                cmd = self.inbox.recv() => match cmd {
                    Some(TableCommand::Shutdown) | None => return false,
                    Some(cmd) => self.apply_command(cmd),
                },
            }
        }
    }

    /// Команды, накопившиеся за время раунда.
    fn drain_pending(&mut self) -> bool {
        loop {
            match self.inbox.try_recv() {
                Ok(TableCommand::Shutdown) | Err(TryRecvError::Disconnected) => return false,
                Ok(cmd) => self.apply_command(cmd),
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    fn apply_command(&mut self, cmd: TableCommand) {
        match cmd {
            TableCommand::SitDown {
                seat,
                player_id,
                stack,
                reply,
            } => {
                let _ = reply.send(self.game.seat_player(seat, player_id, stack));
            }
            TableCommand::Leave { seat, reply } => {
                let _ = reply.send(self.game.unseat_player(seat));
            }
            TableCommand::Rebuy { seat, player, reply } => {
                let elapsed = self.started_at.map(|at| at.elapsed()).unwrap_or_default();
                let _ = reply.send(self.game.try_rebuy(seat, &player.bank, elapsed));
            }
            TableCommand::Shutdown => {}
        }
        self.publish();
    }

    fn set_phase(&mut self, phase: LifecyclePhase) {
        if self.phase != phase {
            debug!(table_id = self.game.table.id, from = ?self.phase, to = ?phase, "phase");
        }
        self.phase = phase;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(GameSnapshot::capture(&self.game, self.phase));
    }

    fn summary(&self) -> GameSummary {
        let mut holders = self
            .game
            .table
            .seats
            .iter()
            .flatten()
            .filter(|p| p.has_stake());
        let winner = match (holders.next(), holders.next()) {
            (Some(p), None) => Some(p.player_id),
            _ => None,
        };

        GameSummary {
            table_id: self.game.table.id,
            rounds_played: self.game.rounds_played(),
            final_level: self.game.current_blind_level.level,
            game_length: self.game.game_length(),
            winner,
            final_snapshot: GameSnapshot::capture(&self.game, self.phase),
        }
    }
}

/// Запустить игровой цикл стола отдельной задачей tokio.
pub fn spawn_game<R, D>(game: Game, rng: R, driver: D) -> GameHandle
where
    R: RandomSource + Send + 'static,
    D: HandDriver,
{
    let table_id = game.table.id;
    let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
    let (controller, snapshots) = GameLifecycleController::new(game, rng, driver, inbox);
    let task = tokio::spawn(controller.run());

    GameHandle {
        table_id,
        commands,
        snapshots,
        task,
    }
}

/// Ручка запущенного стола. Пока она жива, цикл получает команды;
/// если её уронить, ожидающий цикл отменится.
#[derive(Debug)]
pub struct GameHandle {
    table_id: TableId,
    commands: mpsc::Sender<TableCommand>,
    snapshots: watch::Receiver<GameSnapshot>,
    task: JoinHandle<Result<GameOutcome, GameError>>,
}

impl GameHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn sit_down(&self, seat: SeatIndex, player_id: PlayerId, stack: Chips) -> Result<(), GameError> {
        let (reply, answer) = oneshot::channel();
        self.send(TableCommand::SitDown {
            seat,
            player_id,
            stack,
            reply,
        })
        .await?;
        answer.await.map_err(|_| GameError::TableClosed)?
    }

    pub async fn leave(&self, seat: SeatIndex) -> Result<Chips, GameError> {
        let (reply, answer) = oneshot::channel();
        self.send(TableCommand::Leave { seat, reply }).await?;
        answer.await.map_err(|_| GameError::TableClosed)?
    }

    /// `false`, если ребай отклонён или стол уже закрыт.
    pub async fn rebuy(&self, seat: SeatIndex, player: Arc<Player>) -> bool {
        let (reply, answer) = oneshot::channel();
        if self
            .send(TableCommand::Rebuy {
                seat,
                player,
                reply,
            })
            .await
            .is_err()
        {
            return false;
        }
        answer.await.unwrap_or(false)
    }

    /// Попросить цикл остановиться в ближайшей точке ожидания.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(TableCommand::Shutdown).await;
    }

    /// Немедленно отменить задачу стола.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Дождаться конца игры. Отправитель команд живёт до завершения задачи,
    /// чтобы сам `join` не отменял ожидающий цикл.
    pub async fn join(self) -> Result<GameOutcome, GameError> {
        let GameHandle {
            commands,
            snapshots,
            task,
            ..
        } = self;

        let result = task.await;
        drop(commands);

        match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Ok(GameOutcome::Cancelled {
                rounds_played: snapshots.borrow().rounds_played,
            }),
            Err(err) => Err(GameError::TaskFailed(err.to_string())),
        }
    }

    async fn send(&self, cmd: TableCommand) -> Result<(), GameError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| GameError::TableClosed)
    }
}
