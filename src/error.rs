//! Error types for core operations.

use thiserror::Error;

/// Errors raised by the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShoeError {
    /// No undealt cards remain.
    ///
    /// With the 20-card reshuffle threshold this is never expected mid-round;
    /// reaching it indicates an invariant violation, not a normal case.
    #[error("no cards left in the shoe")]
    EmptyShoe,
}

/// Errors raised when validating or loading game settings.
///
/// All of these are fatal at session start; a session never begins with
/// invalid settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `gameType` is not `"Blackjack"`.
    #[error("invalid game type in configuration")]
    InvalidGameType,
    /// `minBet` is not a positive amount.
    #[error("invalid minBet in configuration")]
    InvalidMinBet,
    /// `maxBet` does not exceed `minBet`.
    #[error("invalid maxBet in configuration")]
    InvalidMaxBet,
    /// `numOfDecks` is outside 1..=8.
    #[error("invalid numOfDecks in configuration (must be 1-8)")]
    InvalidNumOfDecks,
    /// `payoutBlackjack` is not positive.
    #[error("invalid payoutBlackjack in configuration")]
    InvalidPayoutBlackjack,
    /// `maxSplits` is outside 0..=4.
    #[error("invalid maxSplits in configuration (must be 0-4)")]
    InvalidMaxSplits,
    /// The rules file could not be read.
    #[error("failed to read rules file")]
    Io(#[from] std::io::Error),
    /// The rules file is not valid JSON for the settings shape.
    #[error("failed to parse rules file")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while placing a bet.
///
/// These are recoverable: the session state is unchanged and the presentation
/// layer is expected to re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Bet is outside the table's configured bounds.
    #[error("bet must be between {min} and {max}")]
    OutOfRange {
        /// Table minimum.
        min: u32,
        /// Table maximum.
        max: u32,
    },
    /// Bet exceeds the player's current bankroll.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// No player with this identifier is seated.
    #[error("player not found")]
    UnknownPlayer,
    /// The player already has a bet for this round.
    #[error("bet already placed for this round")]
    AlreadyPlaced,
    /// A round is already being played out.
    #[error("round already in progress")]
    RoundInProgress,
}

/// Errors raised while dealing a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DealError {
    /// The session is not in the betting phase.
    #[error("invalid phase for dealing")]
    InvalidPhase,
    /// Not every seated player has placed a bet.
    #[error("not every player has placed a bet")]
    MissingBets,
    /// The shoe ran out mid-deal.
    #[error(transparent)]
    Shoe(#[from] ShoeError),
}

/// Errors raised by player actions.
///
/// An action outside the legal set is a contract violation by the
/// presentation layer; the session rejects it without mutating any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The session is not in the player-turn phase.
    #[error("invalid phase for player actions")]
    InvalidPhase,
    /// No hand with this identifier exists in the current round.
    #[error("hand not found")]
    UnknownHand,
    /// The hand is not the one currently awaiting an action.
    #[error("hand is not awaiting an action")]
    NotActiveHand,
    /// The action is not in the hand's legal action set.
    #[error("action is not legal for this hand")]
    IllegalAction,
    /// The shoe ran out mid-action.
    #[error(transparent)]
    Shoe(#[from] ShoeError),
}

/// Errors raised while saving or loading session records.
///
/// The in-memory session is unaffected; only the durable copy failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("session file I/O failed")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("session JSON was invalid")]
    Json(#[from] serde_json::Error),
}
