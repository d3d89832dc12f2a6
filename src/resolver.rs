//! Outcome and payout resolution for completed rounds.

use serde::{Deserialize, Serialize};

use crate::hand::{DealerHand, HandStatus, PlayerHand};

/// Final outcome of a single player hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Player beat the dealer.
    Win,
    /// Dealer beat the player.
    Loss,
    /// Tie; the bet is returned.
    Push,
    /// Natural blackjack, paid at the configured bonus.
    Blackjack,
    /// Player went over 21.
    Bust,
    /// Player surrendered for half the bet.
    Surrender,
}

/// A resolved hand: its outcome and the gross amount returned to the player.
///
/// The payout includes the returned stake (a plain win pays twice the bet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The outcome of the hand.
    pub outcome: Outcome,
    /// Gross payout for the hand, stake included.
    pub payout: u32,
}

/// Resolves one finalized player hand against the finalized dealer hand.
///
/// Pure: no bankroll is touched here. Precedence, first match wins:
/// bust, then blackjack against a non-blackjack dealer, then dealer bust,
/// then the total comparison, then push. When both player and dealer hold
/// blackjack the blackjack arm's guard fails and the 21-vs-21 comparison
/// lands on push, which is the intended tie rule.
///
/// A surrendered hand resolves to half the bet; the orchestrator credits
/// that half at surrender time, not at resolution.
#[must_use]
pub fn resolve_hand(hand: &PlayerHand, dealer: &DealerHand, payout_blackjack: f64) -> Resolution {
    let bet = hand.bet();

    if hand.status() == HandStatus::Surrendered {
        return Resolution {
            outcome: Outcome::Surrender,
            payout: bet / 2,
        };
    }

    if hand.is_busted() {
        return Resolution {
            outcome: Outcome::Bust,
            payout: 0,
        };
    }

    if hand.is_blackjack() && !dealer.is_blackjack() {
        return Resolution {
            outcome: Outcome::Blackjack,
            payout: bet + blackjack_bonus(bet, payout_blackjack),
        };
    }

    if dealer.is_bust() {
        return Resolution {
            outcome: Outcome::Win,
            payout: bet * 2,
        };
    }

    let player_total = hand.value().total;
    let dealer_total = dealer.value().total;

    if player_total > dealer_total {
        Resolution {
            outcome: Outcome::Win,
            payout: bet * 2,
        }
    } else if player_total < dealer_total {
        Resolution {
            outcome: Outcome::Loss,
            payout: 0,
        }
    } else {
        Resolution {
            outcome: Outcome::Push,
            payout: bet,
        }
    }
}

fn blackjack_bonus(bet: u32, payout_blackjack: f64) -> u32 {
    let bonus = (f64::from(bet) * payout_blackjack).round();
    bonus as u32
}
