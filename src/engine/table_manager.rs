// src/engine/table_manager.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::rules::{ConfigError, GameSettings, RuleSet};
use crate::domain::table::Table;
use crate::domain::TableId;
use crate::engine::errors::GameError;
use crate::engine::game::Game;
use crate::engine::lifecycle::{spawn_game, GameHandle, GameOutcome, HandDriver};
use crate::engine::snapshot::GameSnapshot;
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;

/// Супервизор столов:
/// - выдаёт TableId и запускает по одной задаче игрового цикла на стол;
/// - хранит ручки запущенных столов;
/// - закрывает столы по одному или все сразу, собирая итоги.
///
/// Столы друг от друга не зависят: у каждого свой цикл и своё состояние,
/// общие только правила (`Arc<RuleSet>`), которые никто не меняет.
#[derive(Debug, Default)]
pub struct TableSupervisor {
    ids: IdGenerator,
    tables: HashMap<TableId, GameHandle>,
}

impl TableSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Открыть стол и запустить его цикл.
    pub fn open_table<R, D>(
        &mut self,
        name: impl Into<String>,
        max_seats: usize,
        rules: Arc<RuleSet>,
        settings: GameSettings,
        rng: R,
        driver: D,
    ) -> Result<TableId, ConfigError>
    where
        R: RandomSource + Send + 'static,
        D: HandDriver,
    {
        let table_id = self.ids.next_table_id();
        let table = Table::new(table_id, name, max_seats)?;
        let game = Game::new(rules, table, settings)?;

        let handle = spawn_game(game, rng, driver);
        self.tables.insert(table_id, handle);
        info!(table_id, "table spawned");
        Ok(table_id)
    }

    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn handle(&self, table_id: TableId) -> Option<&GameHandle> {
        self.tables.get(&table_id)
    }

    pub fn snapshot(&self, table_id: TableId) -> Option<GameSnapshot> {
        self.tables.get(&table_id).map(GameHandle::snapshot)
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Закрыть один стол: просим цикл остановиться и ждём итог.
    pub async fn close_table(&mut self, table_id: TableId) -> Result<GameOutcome, GameError> {
        let handle = self
            .tables
            .remove(&table_id)
            .ok_or(GameError::TableNotFound(table_id))?;
        handle.shutdown().await;
        handle.join().await
    }

    /// Остановить все столы.
    pub async fn shutdown_all(&mut self) -> Vec<(TableId, Result<GameOutcome, GameError>)> {
        for handle in self.tables.values() {
            handle.shutdown().await;
        }
        self.wait_all().await
    }

    /// Дождаться естественного конца игры на всех столах.
    pub async fn wait_all(&mut self) -> Vec<(TableId, Result<GameOutcome, GameError>)> {
        let mut results = Vec::with_capacity(self.tables.len());
        for table_id in self.table_ids() {
            if let Some(handle) = self.tables.remove(&table_id) {
                results.push((table_id, handle.join().await));
            }
        }
        results
    }
}
