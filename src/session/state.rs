//! Round state machine types and read-only snapshots.

use crate::card::Card;
use crate::hand::{DealerHand, HandId, HandStatus, HandValue, PlayerHand};
use crate::record::DeckState;

/// Phase of the round currently in progress.
///
/// Rounds move strictly `Betting -> Dealing -> PlayerTurn -> DealerTurn ->
/// Resolved`; `Dealing` and `DealerTurn` are transited without suspension,
/// so callers observe them only through records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Accepting one bet per seated player.
    Betting,
    /// Initial cards are going out.
    Dealing,
    /// A player hand is awaiting an action.
    PlayerTurn,
    /// The dealer is playing out their hand.
    DealerTurn,
    /// Outcomes are settled and the round is in the history.
    Resolved,
}

/// One player's seat within the round in progress.
#[derive(Debug, Clone)]
pub(crate) struct Seat {
    pub player_id: String,
    pub position: String,
    pub bet: u32,
    pub initial_cards: [Card; 2],
    pub hands: Vec<PlayerHand>,
}

/// The mutable state of the round in progress.
#[derive(Debug, Clone)]
pub(crate) struct Round {
    pub dealer: DealerHand,
    pub seats: Vec<Seat>,
    pub deck_state: DeckState,
    /// The hand currently awaiting an action, if any.
    pub active: Option<HandId>,
}

impl Round {
    pub(crate) fn locate(&self, hand: HandId) -> Option<(usize, usize)> {
        self.seats.iter().enumerate().find_map(|(si, seat)| {
            seat.hands
                .iter()
                .position(|h| h.id() == hand)
                .map(|hi| (si, hi))
        })
    }

    /// First still-active hand in strict seat and hand order.
    ///
    /// Hands before the current one are always complete, so this is also the
    /// next hand to play after the current one finishes.
    pub(crate) fn first_active_hand(&self) -> Option<HandId> {
        self.seats
            .iter()
            .flat_map(|seat| seat.hands.iter())
            .find(|hand| hand.status().is_active())
            .map(PlayerHand::id)
    }
}

/// Read-only view of a single player hand.
#[derive(Debug, Clone)]
pub struct HandSnapshot {
    /// The hand's stable identifier.
    pub id: HandId,
    /// Owning player.
    pub player_id: String,
    /// Cards in deal order.
    pub cards: Vec<Card>,
    /// Derived value.
    pub value: HandValue,
    /// Bet riding on the hand.
    pub bet: u32,
    /// Current status.
    pub status: HandStatus,
}

impl HandSnapshot {
    pub(crate) fn of(player_id: &str, hand: &PlayerHand) -> Self {
        Self {
            id: hand.id(),
            player_id: player_id.to_owned(),
            cards: hand.cards().to_vec(),
            value: hand.value(),
            bet: hand.bet(),
            status: hand.status(),
        }
    }
}

/// Read-only view of a freshly dealt round.
#[derive(Debug, Clone)]
pub struct RoundSnapshot {
    /// The dealer's visible card.
    pub dealer_up: Card,
    /// Every player hand, in play order.
    pub hands: Vec<HandSnapshot>,
    /// Phase after dealing: `PlayerTurn`, or `Resolved` when every hand was
    /// a natural blackjack and the round settled immediately.
    pub phase: RoundPhase,
}
