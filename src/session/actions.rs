//! Player actions during the player-turn phase.

use crate::error::ActionError;
use crate::hand::{Action, HandId, HandStatus, PlayerHand, can_double, can_split};
use crate::session::state::RoundPhase;

use super::{HandSnapshot, Session};

impl Session {
    /// The set of actions currently legal for a hand.
    ///
    /// Empty unless the round is in the player-turn phase and `hand` is the
    /// one awaiting an action. The presentation layer must offer only these;
    /// [`act`](Self::act) treats anything else as a contract violation.
    #[must_use]
    pub fn legal_actions(&self, hand: HandId) -> Vec<Action> {
        if self.phase != RoundPhase::PlayerTurn {
            return Vec::new();
        }
        let Some(round) = self.round.as_ref() else {
            return Vec::new();
        };
        if round.active != Some(hand) {
            return Vec::new();
        }
        let Some((seat_index, hand_index)) = round.locate(hand) else {
            return Vec::new();
        };

        let seat = &round.seats[seat_index];
        let current = &seat.hands[hand_index];
        if !current.status().is_active() {
            return Vec::new();
        }

        let stack = self.bankroll(&seat.player_id).unwrap_or(0);
        let covers_extra_bet = stack >= i64::from(current.bet());

        let mut actions = vec![Action::Hit, Action::Stand];

        let double_allowed =
            !current.is_from_split() || self.settings.allow_double_after_split;
        if can_double(current.cards()) && double_allowed && covers_extra_bet {
            actions.push(Action::Double);
        }

        let splits_done = seat.hands.len() - 1;
        let resplit_allowed = !(current.is_from_split()
            && current.cards().first().is_some_and(crate::card::Card::is_ace)
            && !self.settings.allow_resplit_aces);
        if can_split(current.cards())
            && splits_done < self.settings.max_splits as usize
            && resplit_allowed
            && covers_extra_bet
        {
            actions.push(Action::Split);
        }

        if self.settings.allow_surrender && current.len() == 2 {
            actions.push(Action::Surrender);
        }

        actions
    }

    /// Applies one action to the hand currently awaiting one.
    ///
    /// The action must be in the hand's legal set; an illegal action is
    /// rejected without mutating any state. Completing the last open hand
    /// cascades straight through the dealer's turn and resolution, so the
    /// phase after a terminal action may already be `Resolved`.
    pub fn act(&mut self, hand: HandId, action: Action) -> Result<HandSnapshot, ActionError> {
        if self.phase != RoundPhase::PlayerTurn {
            return Err(ActionError::InvalidPhase);
        }
        {
            let round = self.round.as_ref().ok_or(ActionError::InvalidPhase)?;
            round.locate(hand).ok_or(ActionError::UnknownHand)?;
            if round.active != Some(hand) {
                return Err(ActionError::NotActiveHand);
            }
        }
        if !self.legal_actions(hand).contains(&action) {
            return Err(ActionError::IllegalAction);
        }

        match action {
            Action::Hit => self.apply_hit(hand)?,
            Action::Stand => self.apply_stand(hand),
            Action::Double => self.apply_double(hand)?,
            Action::Split => self.apply_split(hand)?,
            Action::Surrender => self.apply_surrender(hand),
        }

        self.advance_after(hand)?;

        self.hand_snapshot(hand).ok_or(ActionError::UnknownHand)
    }

    fn hand_mut(&mut self, hand: HandId) -> &mut PlayerHand {
        let round = self
            .round
            .as_mut()
            .expect("round presence was checked by act");
        let (seat_index, hand_index) = round
            .locate(hand)
            .expect("hand presence was checked by act");
        &mut round.seats[seat_index].hands[hand_index]
    }

    fn apply_hit(&mut self, hand: HandId) -> Result<(), ActionError> {
        let card = self.draw()?;
        let current = self.hand_mut(hand);
        current.record_action(Action::Hit);
        current.add_card(card);
        tracing::debug!(card = %card, total = current.value().total, "hit");
        Ok(())
    }

    fn apply_stand(&mut self, hand: HandId) {
        let current = self.hand_mut(hand);
        current.record_action(Action::Stand);
        current.set_status(HandStatus::Stand);
        tracing::debug!(total = current.value().total, "stand");
    }

    fn apply_double(&mut self, hand: HandId) -> Result<(), ActionError> {
        let bet = self.hand_mut(hand).bet();
        let owner = self.owner_of(hand);
        if let Some(stack) = self.bankroll_mut(&owner) {
            *stack -= i64::from(bet);
        }

        let card = self.draw()?;
        let current = self.hand_mut(hand);
        current.record_action(Action::Double);
        current.double_bet();
        current.add_card(card);
        if current.status().is_active() {
            current.set_status(HandStatus::Stand);
        }
        tracing::debug!(card = %card, bet = current.bet(), "double down");
        Ok(())
    }

    fn apply_split(&mut self, hand: HandId) -> Result<(), ActionError> {
        let owner = self.owner_of(hand);
        let bet = self.hand_mut(hand).bet();
        if let Some(stack) = self.bankroll_mut(&owner) {
            *stack -= i64::from(bet);
        }

        let sibling_id = self.alloc_hand_id();
        let first_draw = self.draw()?;
        let second_draw = self.draw()?;

        let round = self
            .round
            .as_mut()
            .expect("round presence was checked by act");
        let (seat_index, hand_index) = round
            .locate(hand)
            .expect("hand presence was checked by act");
        let seat = &mut round.seats[seat_index];

        let current = &mut seat.hands[hand_index];
        current.record_action(Action::Split);
        // The original hand is now a split hand too; a drawn 21 on it is a
        // plain 21, not a natural.
        current.mark_from_split();
        let moved = current
            .take_split_card()
            .expect("split legality was checked against two cards");
        current.add_card(first_draw);

        let mut sibling = PlayerHand::from_split(sibling_id, moved, bet);
        sibling.add_card(second_draw);
        seat.hands.insert(hand_index + 1, sibling);

        tracing::debug!(hands = seat.hands.len(), "split");
        Ok(())
    }

    fn apply_surrender(&mut self, hand: HandId) {
        let owner = self.owner_of(hand);
        let refund = {
            let current = self.hand_mut(hand);
            current.record_action(Action::Surrender);
            current.set_status(HandStatus::Surrendered);
            i64::from(current.bet()) / 2
        };
        if let Some(stack) = self.bankroll_mut(&owner) {
            *stack += refund;
        }
        tracing::debug!(refund, "surrender");
    }

    fn owner_of(&self, hand: HandId) -> String {
        self.round
            .as_ref()
            .and_then(|round| round.locate(hand).map(|(si, _)| round.seats[si].player_id.clone()))
            .expect("hand presence was checked by act")
    }

    /// Re-points the active hand after an action, finishing the round when
    /// no open hand remains.
    fn advance_after(&mut self, hand: HandId) -> Result<(), ActionError> {
        let next = {
            let round = self
                .round
                .as_mut()
                .expect("round presence was checked by act");
            let (seat_index, hand_index) = round
                .locate(hand)
                .expect("hand presence was checked by act");
            if round.seats[seat_index].hands[hand_index].status().is_active() {
                return Ok(());
            }
            round.first_active_hand()
        };

        if let Some(round) = self.round.as_mut() {
            round.active = next;
        }
        if next.is_none() {
            self.finish_round()?;
        }
        Ok(())
    }
}
