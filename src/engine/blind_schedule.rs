//! Построение расписания блайндов из структуры ставок.
//!
//! Кеш: один уровень, `SB = buy_in / ratio`, без анте.
//! Турнир: геометрический рост от стартового SB до потолка `buy_in × max_buy_in_ratio`
//! (это big blind последнего уровня). Стартовый SB равен `buy_in / ratio`, если делится
//! нацело, иначе округляется вверх до стандартного номинала фишек; промежуточные
//! уровни округляются так же. Анте появляется с середины расписания.

use crate::domain::blinds::{BlindLevel, BlindSchedule};
use crate::domain::chips::Chips;
use crate::domain::rules::{BettingStructure, ConfigError, GameMode};

pub fn build_schedule(betting: &BettingStructure) -> Result<BlindSchedule, ConfigError> {
    if betting.buy_in.is_zero() {
        return Err(ConfigError::ZeroBuyIn);
    }
    if betting.max_buy_in_ratio == 0 {
        return Err(ConfigError::ZeroRatio("max_buy_in_ratio"));
    }

    let divisor = betting.blind_ratio.divisor();
    let base_small_blind = betting.buy_in.0 / divisor;
    if base_small_blind == 0 {
        return Err(ConfigError::BlindBelowOneChip {
            buy_in: betting.buy_in,
            divisor,
        });
    }

    match betting.mode {
        GameMode::Cash => Ok(BlindSchedule::new(vec![BlindLevel::new(
            1,
            Chips(base_small_blind),
            Chips::ZERO,
        )])),
        GameMode::Tournament => tournament_schedule(betting, base_small_blind),
    }
}

fn tournament_schedule(betting: &BettingStructure, base_small_blind: u64) -> Result<BlindSchedule, ConfigError> {
    let count = betting.level_count;
    if count == 0 {
        return Err(ConfigError::ZeroLevelCount);
    }

    let divisor = betting.blind_ratio.divisor();
    // Точное частное берём как есть, дробное округляем вверх до номинала.
    let start = if betting.buy_in.0 % divisor == 0 {
        base_small_blind
    } else {
        round_up_to_denomination(base_small_blind)
    };
    let ceiling = (betting.buy_in.0.saturating_mul(u64::from(betting.max_buy_in_ratio)) / 2).max(start);
    let ante_from = (count / 2) as usize;
    let ante_divisor = betting.ante_ratio.divisor();

    let growth = ceiling as f64 / start as f64;
    let steps = count.saturating_sub(1).max(1) as f64;

    let mut levels = Vec::with_capacity(count as usize);
    let mut prev = start;
    for idx in 0..count as usize {
        let small_blind = if idx == 0 {
            start
        } else if idx + 1 == count as usize {
            ceiling
        } else {
            let raw = start as f64 * growth.powf(idx as f64 / steps);
            round_up_to_denomination(raw.round() as u64)
                .min(ceiling)
                .max(prev)
        };
        prev = small_blind;

        let small = Chips(small_blind);
        let ante = if idx >= ante_from {
            Chips((small.doubled().0 / ante_divisor).max(1))
        } else {
            Chips::ZERO
        };
        levels.push(BlindLevel::new(idx as u32 + 1, small, ante));
    }

    Ok(BlindSchedule::new(levels))
}

/// Ближайший сверху номинал из ряда 1, 2, 5, 10, 20, 25, 50, 100, 200, 250, 500, ...
pub fn round_up_to_denomination(value: u64) -> u64 {
    if value <= 1 {
        return value;
    }

    let mut base = 1u64;
    loop {
        let quarter = if base >= 10 { Some(base / 10 * 25) } else { None };
        let candidates = [Some(base), Some(base * 2), quarter, Some(base * 5)];
        for candidate in candidates.into_iter().flatten() {
            if candidate >= value {
                return candidate;
            }
        }
        base = match base.checked_mul(10) {
            Some(next) if next.checked_mul(5).is_some() => next,
            _ => return value,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::round_up_to_denomination;

    #[test]
    fn denominations_round_up() {
        assert_eq!(round_up_to_denomination(1), 1);
        assert_eq!(round_up_to_denomination(3), 5);
        assert_eq!(round_up_to_denomination(12), 20);
        assert_eq!(round_up_to_denomination(21), 25);
        assert_eq!(round_up_to_denomination(26), 50);
        assert_eq!(round_up_to_denomination(100), 100);
        assert_eq!(round_up_to_denomination(201), 250);
        assert_eq!(round_up_to_denomination(251), 500);
    }
}
