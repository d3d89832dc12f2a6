//! Serializable session history records.
//!
//! These shapes are the storage contract: field names and card encodings
//! must stay compatible with previously saved session files.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::hand::Action;
use crate::resolver::Outcome;
use crate::settings::GameSettings;

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable player identifier.
    pub player_id: String,
    /// Display name.
    pub name: String,
    /// Seat label, e.g. `"seat1"`.
    pub position: String,
    /// Bankroll at session start.
    pub starting_stack_size: i64,
    /// Bankroll right now.
    pub current_stack_size: i64,
}

impl Player {
    /// Creates a player with equal starting and current bankroll.
    #[must_use]
    pub fn new(player_id: impl Into<String>, name: impl Into<String>, stack: i64) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            position: "seat1".to_owned(),
            starting_stack_size: stack,
            current_stack_size: stack,
        }
    }
}

/// The dealer's side of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerRecord {
    /// The visible card.
    pub up_card: Card,
    /// The hole card, revealed at round end.
    pub hole_card: Card,
    /// Every dealer card, in deal order.
    pub final_hand: Vec<Card>,
    /// Final hand total.
    pub hand_value: u8,
    /// Whether the dealer went over 21.
    pub busted: bool,
}

/// One player hand (of possibly several after splits) in a finished round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandRecord {
    /// Position among the player's hands for this round.
    pub hand_index: u32,
    /// Cards in the hand, in deal order.
    pub cards: Vec<Card>,
    /// Actions taken, in order.
    pub actions: Vec<Action>,
    /// Final total.
    pub final_value: u8,
    /// Whether the hand went over 21.
    pub busted: bool,
    /// Whether the hand was a natural blackjack.
    pub blackjack: bool,
    /// Resolved outcome.
    pub outcome: Outcome,
    /// Gross payout, stake included.
    pub payout: u32,
}

/// Everything one player did during a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundRecord {
    /// The player's identifier.
    pub player_id: String,
    /// The player's seat label.
    pub position: String,
    /// The two cards originally dealt.
    pub initial_cards: [Card; 2],
    /// The original bet.
    pub bet: u32,
    /// Reserved; always 0 until insurance settlement exists.
    pub insurance_bet: u32,
    /// The player's hands, one or more after splits.
    pub hands: Vec<HandRecord>,
    /// Total amount wagered across hands, doubles included.
    pub total_bet: u32,
    /// Total gross payout across hands.
    pub total_payout: u32,
    /// `total_payout - total_bet`.
    pub net_result: i64,
}

/// Shoe statistics captured when the round was dealt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckState {
    /// Undealt cards at deal time.
    pub cards_remaining: u32,
    /// Remaining-card count that triggers a reshuffle.
    pub shuffle_point: u32,
    /// Fraction of the shoe already dealt.
    pub penetration: f64,
}

/// One finished round, immutable once appended to the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    /// 1-based round counter within the session.
    pub hand_number: u32,
    /// The dealer's final hand.
    pub dealer: DealerRecord,
    /// Per-player actions and outcomes.
    pub player_actions: Vec<PlayerRoundRecord>,
    /// Shoe snapshot taken at deal time.
    pub deck_state: DeckState,
}

/// A complete session: identity, frozen settings, players, and round history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Session identifier.
    pub session_id: String,
    /// Number of resolved rounds.
    pub total_hands_dealt: u32,
    /// The settings the session was started with.
    pub game_settings: GameSettings,
    /// Seated players with current bankrolls.
    pub players: Vec<Player>,
    /// Resolved rounds, in order.
    pub hands: Vec<RoundRecord>,
}
