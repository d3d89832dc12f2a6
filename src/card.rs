//! Card types and the `"<rank> of <suit>"` wire encoding.

use core::fmt;
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits, in deck-construction order.
    pub const ALL: [Self; 4] = [Self::Hearts, Self::Diamonds, Self::Clubs, Self::Spades];

    const fn name(self) -> &'static str {
        match self {
            Self::Hearts => "Hearts",
            Self::Diamonds => "Diamonds",
            Self::Clubs => "Clubs",
            Self::Spades => "Spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A playing card.
///
/// The rank has no intrinsic blackjack value; scoring is derived per hand by
/// the evaluator in [`crate::hand`] (an ace counts 11 or 1 depending on the
/// rest of the hand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    /// The suit of the card.
    pub suit: Suit,
    /// The rank of the card (1 = Ace, 11 = Jack, 12 = Queen, 13 = King).
    pub rank: u8,
}

impl Card {
    /// Creates a new card.
    ///
    /// Note: This function does not validate the rank. Values outside 1..=13
    /// are accepted but may yield non-standard results when evaluating a hand.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    /// Returns whether the card is an ace.
    #[must_use]
    pub const fn is_ace(&self) -> bool {
        self.rank == 1
    }

    fn rank_label(self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }
}

/// Formats the card in the storage representation, e.g. `"A of Hearts"`.
///
/// This exact format is the wire encoding for session records and must stay
/// compatible with previously saved sessions.
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank_label(), self.suit)
    }
}

/// Error produced when parsing a card from its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid card encoding: {0:?}")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank_part, suit_part) = s
            .split_once(" of ")
            .ok_or_else(|| ParseCardError(s.to_owned()))?;

        let rank = match rank_part {
            "A" => 1,
            "J" => 11,
            "Q" => 12,
            "K" => 13,
            other => match other.parse::<u8>() {
                Ok(n) if (2..=10).contains(&n) => n,
                _ => return Err(ParseCardError(s.to_owned())),
            },
        };

        let suit = match suit_part {
            "Hearts" => Suit::Hearts,
            "Diamonds" => Suit::Diamonds,
            "Clubs" => Suit::Clubs,
            "Spades" => Suit::Spades,
            _ => return Err(ParseCardError(s.to_owned())),
        };

        Ok(Self { suit, rank })
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Number of cards per deck.
pub const DECK_SIZE: usize = 52;
