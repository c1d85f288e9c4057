//! Доменная модель стола: фишки, деньги, карты, места, правила, расписание блайндов.

pub mod blinds;
pub mod card;
pub mod chips;
pub mod deck;
pub mod ledger;
pub mod money;
pub mod player;
pub mod rebuy;
pub mod rules;
pub mod table;

pub type PlayerId = u64;
pub type TableId = u64;

pub use blinds::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use ledger::*;
pub use money::*;
pub use player::*;
pub use rebuy::*;
pub use rules::*;
pub use table::*;
