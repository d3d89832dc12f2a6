//! The presentation capability interface and the shared round driver.

use crate::error::{ActionError, BetError, DealError};
use crate::hand::Action;
use crate::record::{Player, RoundRecord};
use crate::session::state::RoundPhase;

use super::{HandSnapshot, RoundSnapshot, Session};

/// Something worth rendering during a round.
#[derive(Debug)]
pub enum TableEvent<'a> {
    /// The shoe is about to be rebuilt before the deal.
    Reshuffled,
    /// The initial deal went out.
    Dealt(&'a RoundSnapshot),
    /// A hand changed after a player action.
    HandUpdated(&'a HandSnapshot),
    /// A bet was rejected; the same player will be prompted again.
    BetRejected(BetError),
    /// The round settled.
    Resolved(&'a RoundRecord),
}

/// Capabilities a front-end provides to the orchestrator.
///
/// Both the terminal and browser presentations implement this trait; the
/// rules flow lives once, in [`Session::play_round`]. Prompts are logically
/// blocking: the orchestrator suspends until a choice arrives. Returning
/// `None` from either prompt is the global quit signal, which aborts the
/// round without persisting it.
pub trait TableIo {
    /// Asks one player for a bet within the table bounds.
    fn prompt_bet(&mut self, player: &Player, min_bet: u32, max_bet: u32) -> Option<u32>;

    /// Asks for the next action on a hand, offering only the legal set.
    fn prompt_action(&mut self, hand: &HandSnapshot, legal: &[Action]) -> Option<Action>;

    /// Renders a table event.
    fn render(&mut self, event: TableEvent<'_>);
}

impl Session {
    /// Drives one complete round through the presentation capabilities.
    ///
    /// Returns `Ok(true)` when the round resolved and `Ok(false)` when the
    /// front-end quit mid-round; in the latter case the unresolved round is
    /// abandoned and its stakes returned.
    pub fn play_round<T: TableIo>(&mut self, io: &mut T) -> Result<bool, DealError> {
        let players = self.players.to_vec();
        let (min_bet, max_bet) = (self.settings.min_bet, self.settings.max_bet);

        for player in &players {
            loop {
                let Some(amount) = io.prompt_bet(player, min_bet, max_bet) else {
                    self.abandon_round();
                    return Ok(false);
                };
                match self.place_bet(&player.player_id, amount) {
                    Ok(()) => break,
                    Err(err) => io.render(TableEvent::BetRejected(err)),
                }
            }
        }

        if self.needs_reshuffle() {
            io.render(TableEvent::Reshuffled);
        }

        let snapshot = self.deal_round()?;
        io.render(TableEvent::Dealt(&snapshot));

        while self.phase() == RoundPhase::PlayerTurn {
            let Some(hand_id) = self.current_hand() else {
                break;
            };
            let legal = self.legal_actions(hand_id);
            let Some(view) = self.hand_snapshot(hand_id) else {
                break;
            };

            let Some(action) = io.prompt_action(&view, &legal) else {
                self.abandon_round();
                return Ok(false);
            };

            match self.act(hand_id, action) {
                Ok(updated) => io.render(TableEvent::HandUpdated(&updated)),
                Err(ActionError::Shoe(err)) => return Err(DealError::Shoe(err)),
                Err(err) => {
                    // The front-end offered an action outside the legal set;
                    // state is unchanged, so prompt again.
                    tracing::warn!(%err, "rejected action from front-end");
                }
            }
        }

        if let Some(record) = self.last_round() {
            io.render(TableEvent::Resolved(record));
        }
        Ok(true)
    }
}
