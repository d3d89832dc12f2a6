//! Hand evaluation and player/dealer hand representations.

use serde::{Deserialize, Serialize};

use crate::card::Card;

const fn card_value(rank: u8) -> u8 {
    match rank {
        1 => 11,
        2..=10 => rank,
        11..=13 => 10,
        _ => 0,
    }
}

const fn is_ten_value(rank: u8) -> bool {
    matches!(rank, 10..=13)
}

/// A hand's derived value: the best total and whether it is soft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandValue {
    /// Best total without busting, if possible.
    pub total: u8,
    /// True iff at least one ace is still counted as 11.
    pub soft: bool,
}

/// Computes the value of a card set.
///
/// Aces start at 11 and are demoted to 1 one at a time while the total
/// exceeds 21 and a demotable ace remains. Order of the cards does not
/// matter.
#[must_use]
pub fn hand_value(cards: &[Card]) -> HandValue {
    let mut total: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total = total.saturating_add(card_value(card.rank));
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    HandValue {
        total,
        soft: aces > 0 && total <= 21,
    }
}

/// True iff the hand is exactly two cards totalling 21.
///
/// Never true for three or more cards, even when they total 21.
#[must_use]
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards).total == 21
}

/// True iff the two cards share a rank or both belong to the ten-value group
/// {10, J, Q, K}.
#[must_use]
pub fn can_split(cards: &[Card]) -> bool {
    match cards {
        [a, b] => a.rank == b.rank || (is_ten_value(a.rank) && is_ten_value(b.rank)),
        _ => false,
    }
}

/// True iff doubling down is still possible (first action only).
#[must_use]
pub fn can_double(cards: &[Card]) -> bool {
    cards.len() == 2
}

/// A player action within a round.
///
/// Closed set; the orchestrator matches exhaustively so adding or removing an
/// action is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Draw one card.
    Hit,
    /// Finish the hand at its current total.
    Stand,
    /// Double the bet, draw exactly one card, finish the hand.
    Double,
    /// Split a pair into two hands.
    Split,
    /// Forfeit the hand for half the bet back.
    Surrender,
}

/// Stable identifier for a player hand within a session.
///
/// Hand identifiers survive splits; a split inserts a sibling hand with a
/// fresh identifier instead of renumbering existing hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandId(pub(crate) u32);

/// Hand status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStatus {
    /// Hand is active and can take actions.
    Active,
    /// Player has stood (or reached 21).
    Stand,
    /// Hand has busted (over 21).
    Bust,
    /// Hand is a blackjack (natural 21).
    Blackjack,
    /// Player has surrendered.
    Surrendered,
}

impl HandStatus {
    /// Whether the hand can still take actions.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A player's hand.
#[derive(Debug, Clone)]
pub struct PlayerHand {
    id: HandId,
    cards: Vec<Card>,
    actions: Vec<Action>,
    status: HandStatus,
    bet: u32,
    from_split: bool,
}

impl PlayerHand {
    pub(crate) const fn new(id: HandId, bet: u32) -> Self {
        Self {
            id,
            cards: Vec::new(),
            actions: Vec::new(),
            status: HandStatus::Active,
            bet,
            from_split: false,
        }
    }

    pub(crate) fn from_split(id: HandId, card: Card, bet: u32) -> Self {
        Self {
            id,
            cards: vec![card],
            actions: Vec::new(),
            status: HandStatus::Active,
            bet,
            from_split: true,
        }
    }

    /// The hand's stable identifier.
    #[must_use]
    pub const fn id(&self) -> HandId {
        self.id
    }

    /// Adds a card and updates the status.
    ///
    /// Busting completes the hand, as does reaching exactly 21. A natural 21
    /// on the first two cards of a non-split hand is a blackjack.
    pub(crate) fn add_card(&mut self, card: Card) {
        self.cards.push(card);

        let value = hand_value(&self.cards);
        if value.total > 21 {
            self.status = HandStatus::Bust;
        } else if value.total == 21 {
            self.status = if self.cards.len() == 2 && !self.from_split {
                HandStatus::Blackjack
            } else {
                HandStatus::Stand
            };
        }
    }

    pub(crate) fn record_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub(crate) const fn set_status(&mut self, status: HandStatus) {
        self.status = status;
    }

    /// Marks the surviving half of a split; both halves of a split pair are
    /// from-split hands.
    pub(crate) const fn mark_from_split(&mut self) {
        self.from_split = true;
    }

    pub(crate) const fn double_bet(&mut self) {
        self.bet *= 2;
    }

    /// Removes and returns the second card when splitting.
    pub(crate) fn take_split_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }

    /// Cards in the hand, in deal order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Actions taken on this hand, in order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> HandStatus {
        self.status
    }

    /// Bet riding on this hand (doubled after a double down).
    #[must_use]
    pub const fn bet(&self) -> u32 {
        self.bet
    }

    /// Whether this hand was created by a split.
    #[must_use]
    pub const fn is_from_split(&self) -> bool {
        self.from_split
    }

    /// The hand's derived value.
    #[must_use]
    pub fn value(&self) -> HandValue {
        hand_value(&self.cards)
    }

    /// Whether the hand busted.
    #[must_use]
    pub fn is_busted(&self) -> bool {
        matches!(self.status, HandStatus::Bust)
    }

    /// Whether the hand is a natural blackjack.
    ///
    /// Answers from the status, not the cards: a two-card 21 on a split hand
    /// is `Stand`, so this stays false where the card-shape check
    /// [`is_blackjack`] would say true.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        matches!(self.status, HandStatus::Blackjack)
    }

    /// Number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The dealer's hand.
///
/// The hole card (second card) stays hidden until the dealer's turn or an
/// immediate blackjack resolution reveals it.
#[derive(Debug, Clone, Default)]
pub struct DealerHand {
    cards: Vec<Card>,
    hole_revealed: bool,
}

impl DealerHand {
    /// Creates a new empty dealer hand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            hole_revealed: false,
        }
    }

    /// Adds a card to the hand.
    pub(crate) fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// All cards in the hand, including a hidden hole card.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The visible card (first card).
    #[must_use]
    pub fn up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// The hole card (second card), regardless of visibility.
    #[must_use]
    pub fn hole_card(&self) -> Option<Card> {
        self.cards.get(1).copied()
    }

    /// Whether the hole card is revealed.
    #[must_use]
    pub const fn is_hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub(crate) const fn reveal_hole(&mut self) {
        self.hole_revealed = true;
    }

    /// The value visible to players: the full hand once the hole card is
    /// revealed, otherwise the up card alone.
    #[must_use]
    pub fn visible_total(&self) -> u8 {
        if self.hole_revealed {
            self.value().total
        } else {
            self.cards.first().map_or(0, |c| card_value(c.rank))
        }
    }

    /// The full value of the hand.
    #[must_use]
    pub fn value(&self) -> HandValue {
        hand_value(&self.cards)
    }

    /// Whether the hand is a blackjack.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    /// Whether the hand is bust.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value().total > 21
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
