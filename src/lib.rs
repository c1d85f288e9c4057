//! Игровая логика покерного стола: расписание блайндов, старт и конец игры,
//! честный розыгрыш кнопки, обязательные ставки и потокобезопасный банк игрока.

pub mod domain;
pub mod engine;
pub mod infra;
