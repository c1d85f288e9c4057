// src/bin/table_sim.rs
//
// Мульти-табличная симуляция: несколько столов параллельно, раздачи
// разыгрываются случайным шоудауном, пока на каждом столе не останется один стек.
//
// Параметры берутся из переменных окружения (см. `SimulationConfig`), логи через RUST_LOG.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use poker_table_engine::domain::{
    Player, PlayerId, PlayerStatus, RuleSet, SeatIndex, Table, TableId,
};
use poker_table_engine::engine::{GameError, GameOutcome, HandDriver, RoundStart, TableSupervisor};
use poker_table_engine::infra::{DeterministicRng, IdGenerator, SimulationConfig, SystemRng};

/// Случайный розыгрыш раздачи: кто-то уравнивает, кто-то идёт олл-ин,
/// кто-то сбрасывает; банк целиком уходит случайному оставшемуся игроку.
struct RandomShowdown {
    rng: StdRng,
}

impl RandomShowdown {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl HandDriver for RandomShowdown {
    fn play_hand(&mut self, table: &mut Table, round: &RoundStart) -> Result<(), GameError> {
        let contenders: Vec<SeatIndex> = (0..table.max_seats())
            .map(|idx| idx as SeatIndex)
            .filter(|&seat| table.seat(seat).map(|p| p.is_participating_game()).unwrap_or(false))
            .collect();

        let mut in_hand = Vec::with_capacity(contenders.len());
        for seat in contenders {
            let Some(p) = table.seat_mut(seat) else { continue };

            if p.has_stake() {
                let roll: u8 = self.rng.gen_range(0..6);
                let stack = p.stack;
                let paid = match roll {
                    0 => p.force_bet(stack),
                    1 => {
                        p.status = PlayerStatus::Folded;
                        continue;
                    }
                    _ => p.force_bet(round.initial_call - p.current_bet),
                };
                table.pot.add(paid);
            }
            in_hand.push(seat);
        }

        if in_hand.is_empty() {
            return Err(GameError::Driver(format!("round {}: everybody folded", round.round)));
        }

        let winner = in_hand[self.rng.gen_range(0..in_hand.len())];
        let won = table.pot.take();
        if let Some(p) = table.seat_mut(winner) {
            p.stack += won;
            debug!(table_id = table.id, round = round.round, seat = winner, %won, "showdown");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SimulationConfig::from_env();
    if let Err(err) = run(config).await {
        error!(%err, "simulation failed");
        std::process::exit(1);
    }
}

async fn run(config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rules = Arc::new(RuleSet::new(
        config.betting.clone(),
        config.rebuy,
        config.buy_in_price,
    )?);
    info!(
        mode = ?rules.mode(),
        buy_in = %rules.buy_in(),
        levels = rules.schedule().len(),
        "rules ready"
    );
    for level in &rules.schedule().levels {
        debug!(
            level = level.level,
            small_blind = %level.small_blind,
            big_blind = %level.big_blind,
            ante = %level.ante,
            "blind level"
        );
    }

    let ids = IdGenerator::new();
    let mut supervisor = TableSupervisor::new();
    let mut players: HashMap<PlayerId, Arc<Player>> = HashMap::new();

    for n in 0..config.tables {
        let name = format!("SIM TABLE {}", n + 1);
        let driver_seed = config.seed.unwrap_or_else(rand::random).wrapping_add(n as u64);
        let driver = RandomShowdown::new(driver_seed);

        let table_id = match config.seed {
            Some(seed) => supervisor.open_table(
                name,
                config.max_seats,
                Arc::clone(&rules),
                config.settings.clone(),
                DeterministicRng::from_seed(seed.wrapping_add(n as u64)),
                driver,
            )?,
            None => supervisor.open_table(
                name,
                config.max_seats,
                Arc::clone(&rules),
                config.settings.clone(),
                SystemRng,
                driver,
            )?,
        };

        let Some(handle) = supervisor.handle(table_id) else { continue };
        for seat in 0..config.players_per_table.min(config.max_seats) {
            let player_id = ids.next_player_id();
            let player = Arc::new(Player::new(
                player_id,
                format!("player-{player_id}"),
                config.starting_balance,
            ));
            if !player.bank.try_remove_funds(rules.buy_in_price()) {
                warn!(player_id, balance = %player.bank.balance(), "cannot afford buy-in");
                continue;
            }
            handle.sit_down(seat as SeatIndex, player_id, rules.buy_in()).await?;
            players.insert(player_id, player);
        }
    }

    offer_rebuys(&supervisor, &players, config.settings.hand_pause).await;

    for (table_id, result) in supervisor.wait_all().await {
        match result {
            Ok(outcome) => report(table_id, &outcome)?,
            Err(err) => warn!(table_id, %err, "table failed"),
        }
    }

    let mut balances: Vec<_> = players.values().collect();
    balances.sort_by_key(|p| p.id);
    for player in balances {
        info!(player_id = player.id, name = %player.name, balance = %player.bank.balance(), "final balance");
    }
    Ok(())
}

/// Пока столы играют, предлагаем ребай каждому вылетевшему месту (один раз на вылет).
async fn offer_rebuys(
    supervisor: &TableSupervisor,
    players: &HashMap<PlayerId, Arc<Player>>,
    pause: Duration,
) {
    let mut offered: HashSet<(TableId, PlayerId, u32)> = HashSet::new();
    let tick = pause.max(Duration::from_millis(10));

    loop {
        let mut running = 0;
        for table_id in supervisor.table_ids() {
            let Some(handle) = supervisor.handle(table_id) else { continue };
            if handle.is_finished() {
                continue;
            }
            running += 1;

            let snapshot = handle.snapshot();
            for seat in snapshot.seats.iter().filter(|s| s.status == PlayerStatus::Busted) {
                if !offered.insert((table_id, seat.player_id, seat.rebuys)) {
                    continue;
                }
                let Some(player) = players.get(&seat.player_id) else { continue };
                let accepted = handle.rebuy(seat.seat, Arc::clone(player)).await;
                info!(table_id, player_id = seat.player_id, accepted, "rebuy offered");
            }
        }

        if running == 0 {
            return;
        }
        tokio::time::sleep(tick).await;
    }
}

fn report(table_id: TableId, outcome: &GameOutcome) -> Result<(), serde_json::Error> {
    match outcome {
        GameOutcome::Finished(summary) => info!(
            table_id,
            rounds = summary.rounds_played,
            winner = ?summary.winner,
            final_level = summary.final_level,
            summary = %serde_json::to_string(summary)?,
            "table finished"
        ),
        GameOutcome::Cancelled { rounds_played } => {
            info!(table_id, rounds_played, "table cancelled")
        }
    }
    Ok(())
}
