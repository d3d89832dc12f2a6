//! A single-table blackjack simulator.
//!
//! The crate centers on a [`Session`] orchestrator that drives full rounds
//! of blackjack over a shared rules engine: a multi-deck [`Shoe`], a pure
//! hand evaluator, the dealer drawing policy, and a pure outcome resolver.
//! Front-ends (a line-based terminal session, a browser UI) wrap the same
//! orchestrator through the [`TableIo`] capability trait, and finished
//! sessions serialize to a stable JSON shape for persistence.
//!
//! # Example
//!
//! ```no_run
//! use twentyone::{GameSettings, Player, Session};
//!
//! let settings = GameSettings::default();
//! let players = vec![Player::new("player1", "Ada", 10_000)];
//! let session = Session::new(settings, players, 42)?;
//! let _ = session;
//! # Ok::<(), twentyone::SettingsError>(())
//! ```

pub mod card;
pub mod error;
pub mod hand;
pub mod policy;
pub mod record;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod shoe;
pub mod store;

// Re-export main types
pub use card::{Card, DECK_SIZE, Suit};
pub use error::{ActionError, BetError, DealError, SettingsError, ShoeError, StoreError};
pub use hand::{
    Action, DealerHand, HandId, HandStatus, HandValue, PlayerHand, can_double, can_split,
    hand_value, is_blackjack,
};
pub use policy::dealer_should_hit;
pub use record::{Player, RoundRecord, SessionRecord};
pub use resolver::{Outcome, Resolution, resolve_hand};
pub use session::state::RoundPhase;
pub use session::{HandSnapshot, RoundSnapshot, Session, SessionSummary, TableEvent, TableIo};
pub use settings::{GameSettings, load_settings};
pub use shoe::{RESHUFFLE_THRESHOLD, Shoe};
