use core::cmp::Ordering;
use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Масть карты.
///
/// Порядок мастей нужен только для розыгрыша кнопки дилера (разрешение ничьих по рангу):
/// трефы < бубны < червы < пики.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    const SYMBOLS: [char; 4] = ['c', 'd', 'h', 's'];

    pub fn symbol(self) -> char {
        Self::SYMBOLS[self as usize]
    }

    fn from_symbol(ch: char) -> Option<Self> {
        let lower = ch.to_ascii_lowercase();
        Self::SYMBOLS
            .iter()
            .position(|&sym| sym == lower)
            .map(|idx| Self::ALL[idx])
    }
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    const SYMBOLS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

    pub fn symbol(self) -> char {
        Self::SYMBOLS[self as usize - Rank::Two as usize]
    }

    fn from_symbol(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        Self::SYMBOLS
            .iter()
            .position(|&sym| sym == upper)
            .map(|idx| Self::ALL[idx])
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

/// Сначала ранг, потом масть. Две разные карты одной колоды никогда не равны.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.suit.cmp(&other.suit))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    /// `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("card must be two characters, got {s:?}"));
        };

        let rank = Rank::from_symbol(r).ok_or_else(|| format!("unknown rank {r:?} in {s:?}"))?;
        let suit = Suit::from_symbol(su).ok_or_else(|| format!("unknown suit {su:?} in {s:?}"))?;
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_agree() {
        for text in ["Ah", "Td", "7c", "2s"] {
            let card: Card = text.parse().unwrap();
            assert_eq!(card.to_string(), text);
        }
        assert_eq!("kS".parse::<Card>().unwrap(), Card::new(Rank::King, Suit::Spades));
        assert!("1h".parse::<Card>().is_err());
        assert!("Ahh".parse::<Card>().is_err());
    }

    #[test]
    fn rank_beats_suit() {
        let two_spades = Card::new(Rank::Two, Suit::Spades);
        let three_clubs = Card::new(Rank::Three, Suit::Clubs);
        assert!(three_clubs > two_spades);
        assert!(Card::new(Rank::Ace, Suit::Spades) > Card::new(Rank::Ace, Suit::Hearts));
    }
}
