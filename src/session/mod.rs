//! The session orchestrator.
//!
//! One [`Session`] value drives every round of a single-table game: it owns
//! the shoe, the frozen settings copy, the players' bankrolls, and the
//! append-only round history. All mutation goes through `&mut self`
//! transitions, so a session has exactly one writer by construction; any
//! front-end (terminal or browser) wraps the same orchestrator through the
//! [`TableIo`] capability trait.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::Card;
use crate::error::{SettingsError, ShoeError};
use crate::hand::{DealerHand, HandId};
use crate::record::{Player, RoundRecord, SessionRecord};
use crate::settings::GameSettings;
use crate::shoe::Shoe;

mod actions;
mod betting;
mod driver;
mod resolve;
pub mod state;

use state::{Round, RoundPhase};

pub use driver::{TableEvent, TableIo};
pub use state::{HandSnapshot, RoundSnapshot};

/// A single-table blackjack session.
pub struct Session {
    id: String,
    settings: GameSettings,
    players: Vec<Player>,
    shoe: Shoe,
    rng: ChaCha8Rng,
    phase: RoundPhase,
    total_hands_dealt: u32,
    history: Vec<RoundRecord>,
    /// Bets accepted during the betting phase, in seat order.
    pending_bets: Vec<(String, u32)>,
    round: Option<Round>,
    next_hand_id: u32,
}

impl Session {
    /// Starts a session with validated settings and seated players.
    ///
    /// The settings are copied into the session; later mutation of the
    /// caller's value cannot affect rounds in progress. The seed drives the
    /// shoe shuffle, so a fixed seed replays the same card sequence.
    ///
    /// # Errors
    ///
    /// Returns the first settings validation failure; no session starts with
    /// invalid settings.
    pub fn new(
        settings: GameSettings,
        players: Vec<Player>,
        seed: u64,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let shoe = Shoe::new(settings.num_of_decks, &mut rng);

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let id = format!("session_{millis}");

        tracing::info!(
            session_id = %id,
            players = players.len(),
            decks = settings.num_of_decks,
            "session started"
        );

        Ok(Self {
            id,
            settings,
            players,
            shoe,
            rng,
            phase: RoundPhase::Betting,
            total_hands_dealt: 0,
            history: Vec::new(),
            pending_bets: Vec::new(),
            round: None,
            next_hand_id: 0,
        })
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The frozen settings copy.
    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The seated players with their current bankrolls.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The current round phase.
    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of resolved rounds so far.
    #[must_use]
    pub const fn total_hands_dealt(&self) -> u32 {
        self.total_hands_dealt
    }

    /// Resolved rounds, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// The most recently resolved round.
    #[must_use]
    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.history.last()
    }

    /// Cards still drawable from the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.cards_remaining()
    }

    /// Fraction of the shoe already dealt.
    #[must_use]
    pub fn penetration(&self) -> f64 {
        self.shoe.penetration()
    }

    /// Whether the next deal will rebuild the shoe first.
    #[must_use]
    pub fn needs_reshuffle(&self) -> bool {
        self.shoe.needs_reshuffle()
    }

    /// Replaces the shoe wholesale.
    ///
    /// Intended for deterministic tests and replays; pair it with
    /// [`Shoe::rigged`] to fix the draw order.
    pub fn replace_shoe(&mut self, shoe: Shoe) {
        self.shoe = shoe;
    }

    /// The hand currently awaiting an action.
    #[must_use]
    pub fn current_hand(&self) -> Option<HandId> {
        self.round.as_ref().and_then(|round| round.active)
    }

    /// Read-only view of one hand in the current round.
    #[must_use]
    pub fn hand_snapshot(&self, hand: HandId) -> Option<HandSnapshot> {
        let round = self.round.as_ref()?;
        let (seat_index, hand_index) = round.locate(hand)?;
        let seat = &round.seats[seat_index];
        Some(HandSnapshot::of(&seat.player_id, &seat.hands[hand_index]))
    }

    /// The dealer's hand for the round in progress, hole card hidden until
    /// the dealer's turn.
    #[must_use]
    pub fn dealer_hand(&self) -> Option<&DealerHand> {
        self.round.as_ref().map(|round| &round.dealer)
    }

    /// Serializable snapshot of the whole session for persistence.
    #[must_use]
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            session_id: self.id.clone(),
            total_hands_dealt: self.total_hands_dealt,
            game_settings: self.settings.clone(),
            players: self.players.clone(),
            hands: self.history.clone(),
        }
    }

    /// Aborts the round in progress, returning every stake deducted for it.
    ///
    /// Resolved rounds already in the history are untouched. This is the
    /// "quit" signal of the front-ends; it never persists the aborted round.
    pub fn abandon_round(&mut self) {
        // A resolved round already settled; only an in-flight one holds stakes.
        let unresolved = self.round.is_some() && self.phase != RoundPhase::Resolved;

        let round = self.round.take();
        if let Some(round) = round.filter(|_| unresolved) {
            for seat in &round.seats {
                let refund: i64 = seat
                    .hands
                    .iter()
                    .map(|hand| {
                        let bet = i64::from(hand.bet());
                        // Surrendered hands already got half back.
                        if hand.status() == crate::hand::HandStatus::Surrendered {
                            bet - bet / 2
                        } else {
                            bet
                        }
                    })
                    .sum();
                if let Some(stack) = self.bankroll_mut(&seat.player_id) {
                    *stack += refund;
                }
            }
        }

        let pending: Vec<(String, u32)> = self.pending_bets.drain(..).collect();
        for (player_id, amount) in pending {
            if let Some(stack) = self.bankroll_mut(&player_id) {
                *stack += i64::from(amount);
            }
        }

        if unresolved {
            tracing::info!(session_id = %self.id, "round abandoned");
        }
        self.phase = RoundPhase::Betting;
    }

    /// Ends the session, discarding any unresolved round, and returns the
    /// final summary.
    #[must_use]
    pub fn end_session(mut self) -> SessionSummary {
        self.abandon_round();
        tracing::info!(
            session_id = %self.id,
            rounds = self.total_hands_dealt,
            "session ended"
        );
        SessionSummary {
            record: self.to_record(),
        }
    }

    pub(crate) fn draw(&mut self) -> Result<Card, ShoeError> {
        self.shoe.deal()
    }

    pub(crate) fn alloc_hand_id(&mut self) -> HandId {
        let id = HandId(self.next_hand_id);
        self.next_hand_id += 1;
        id
    }

    pub(crate) fn bankroll_mut(&mut self, player_id: &str) -> Option<&mut i64> {
        self.players
            .iter_mut()
            .find(|p| p.player_id == player_id)
            .map(|p| &mut p.current_stack_size)
    }

    pub(crate) fn bankroll(&self, player_id: &str) -> Option<i64> {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.current_stack_size)
    }
}

/// Final state of an ended session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// The full serializable session record.
    pub record: SessionRecord,
}

impl SessionSummary {
    /// Net bankroll change for one player over the whole session.
    #[must_use]
    pub fn net(&self, player_id: &str) -> Option<i64> {
        self.record
            .players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.current_stack_size - p.starting_stack_size)
    }
}
