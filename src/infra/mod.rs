//! Инфраструктура вокруг игрового движка:
//! - генерация ID;
//! - RNG-реализации;
//! - конфигурация из окружения.

pub mod config;
pub mod ids;
pub mod rng;

pub use config::SimulationConfig;
pub use ids::IdGenerator;
pub use rng::{DeterministicRng, SystemRng};
