//! Multi-deck shoe with dealt/undealt tracking.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, DECK_SIZE, Suit};
use crate::error::ShoeError;

/// Remaining-card threshold below which the orchestrator rebuilds the shoe
/// before dealing the next round.
pub const RESHUFFLE_THRESHOLD: usize = 20;

/// A shoe built from one or more shuffled 52-card decks.
///
/// Cards live in exactly one of two partitions: `undealt` (drawable, back of
/// the vec is the next card) and `dealt` (history). The shoe never reshuffles
/// itself; the session replaces it wholesale when
/// [`needs_reshuffle`](Self::needs_reshuffle) reports true.
#[derive(Debug, Clone)]
pub struct Shoe {
    undealt: Vec<Card>,
    dealt: Vec<Card>,
}

impl Shoe {
    /// Builds a shoe of `num_decks` decks, Fisher-Yates shuffled with `rng`.
    #[must_use]
    pub fn new(num_decks: u8, rng: &mut ChaCha8Rng) -> Self {
        let mut undealt = Vec::with_capacity(num_decks as usize * DECK_SIZE);

        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in 1..=13 {
                    undealt.push(Card::new(suit, rank));
                }
            }
        }

        undealt.shuffle(rng);

        Self {
            undealt,
            dealt: Vec::new(),
        }
    }

    /// Builds a shoe whose draw order is exactly `draws`.
    ///
    /// Intended for deterministic tests and replays.
    #[must_use]
    pub fn rigged(draws: Vec<Card>) -> Self {
        let mut undealt = draws;
        undealt.reverse();
        Self {
            undealt,
            dealt: Vec::new(),
        }
    }

    /// Deals the next card, moving it from the undealt to the dealt partition.
    pub fn deal(&mut self) -> Result<Card, ShoeError> {
        let card = self.undealt.pop().ok_or(ShoeError::EmptyShoe)?;
        self.dealt.push(card);
        Ok(card)
    }

    /// Number of cards still drawable.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.undealt.len()
    }

    /// Number of cards already dealt.
    #[must_use]
    pub fn dealt_count(&self) -> usize {
        self.dealt.len()
    }

    /// Fraction of the shoe already dealt, in `0.0..=1.0`.
    #[must_use]
    pub fn penetration(&self) -> f64 {
        let total = self.undealt.len() + self.dealt.len();
        if total == 0 {
            return 0.0;
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "f64 has sufficient precision for card counts"
        )]
        {
            self.dealt.len() as f64 / total as f64
        }
    }

    /// Whether the remaining cards have dropped below the reshuffle threshold.
    #[must_use]
    pub fn needs_reshuffle(&self) -> bool {
        self.undealt.len() < RESHUFFLE_THRESHOLD
    }
}
