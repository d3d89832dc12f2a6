//! Betting and the initial deal.

use crate::error::{BetError, DealError};
use crate::hand::PlayerHand;
use crate::record::DeckState;
use crate::session::state::{Round, RoundPhase, RoundSnapshot, Seat};
use crate::shoe::{RESHUFFLE_THRESHOLD, Shoe};

use super::{HandSnapshot, Session};

impl Session {
    /// Moves a resolved session back into the betting phase.
    fn ensure_betting(&mut self) {
        if self.phase == RoundPhase::Resolved {
            self.round = None;
            self.pending_bets.clear();
            self.phase = RoundPhase::Betting;
        }
    }

    /// Places one bet for the round about to be dealt.
    ///
    /// The bet must be within the table bounds and covered by the player's
    /// bankroll; the stake is deducted immediately. Errors leave the session
    /// unchanged so the presentation layer can re-prompt.
    pub fn place_bet(&mut self, player_id: &str, amount: u32) -> Result<(), BetError> {
        self.ensure_betting();
        if self.phase != RoundPhase::Betting {
            return Err(BetError::RoundInProgress);
        }
        if self.pending_bets.iter().any(|(id, _)| id == player_id) {
            return Err(BetError::AlreadyPlaced);
        }

        let stack = self.bankroll(player_id).ok_or(BetError::UnknownPlayer)?;

        let (min, max) = (self.settings.min_bet, self.settings.max_bet);
        if amount < min || amount > max {
            return Err(BetError::OutOfRange { min, max });
        }
        if i64::from(amount) > stack {
            return Err(BetError::InsufficientFunds);
        }

        if let Some(stack) = self.bankroll_mut(player_id) {
            *stack -= i64::from(amount);
        }
        self.pending_bets.push((player_id.to_owned(), amount));
        tracing::debug!(player = player_id, amount, "bet placed");
        Ok(())
    }

    /// Deals the next round once every seated player has bet.
    ///
    /// Rebuilds the shoe first when it has dropped below the 20-card
    /// threshold (a full reshuffle, never a top-up). Cards go out in fixed
    /// order: dealer up card, dealer hole card, then two cards per player in
    /// seat order. A player dealt a natural blackjack skips their turn; if
    /// every hand is complete at the deal the round settles immediately and
    /// the returned snapshot's phase is already `Resolved`.
    pub fn deal_round(&mut self) -> Result<RoundSnapshot, DealError> {
        self.ensure_betting();
        if self.phase != RoundPhase::Betting {
            return Err(DealError::InvalidPhase);
        }
        if self.pending_bets.len() != self.players.len() {
            return Err(DealError::MissingBets);
        }

        if self.shoe.needs_reshuffle() {
            let decks = self.settings.num_of_decks;
            self.shoe = Shoe::new(decks, &mut self.rng);
            tracing::info!(decks, "shoe reshuffled");
        }

        self.phase = RoundPhase::Dealing;

        let mut dealer = crate::hand::DealerHand::new();
        dealer.add_card(self.draw()?);
        dealer.add_card(self.draw()?);

        let bets: Vec<(String, u32)> = self.pending_bets.drain(..).collect();
        let mut seats = Vec::with_capacity(bets.len());

        for (player_id, bet) in bets {
            let first = self.draw()?;
            let second = self.draw()?;

            let mut hand = PlayerHand::new(self.alloc_hand_id(), bet);
            hand.add_card(first);
            hand.add_card(second);

            if hand.is_blackjack() {
                tracing::debug!(player = %player_id, "natural blackjack");
            }

            let position = self
                .players
                .iter()
                .find(|p| p.player_id == player_id)
                .map_or_else(|| "seat1".to_owned(), |p| p.position.clone());

            seats.push(Seat {
                player_id,
                position,
                bet,
                initial_cards: [first, second],
                hands: vec![hand],
            });
        }

        let deck_state = DeckState {
            cards_remaining: self.shoe.cards_remaining() as u32,
            shuffle_point: RESHUFFLE_THRESHOLD as u32,
            penetration: self.shoe.penetration(),
        };

        let mut round = Round {
            dealer,
            seats,
            deck_state,
            active: None,
        };
        round.active = round.first_active_hand();
        let all_complete = round.active.is_none();
        self.round = Some(round);

        tracing::debug!(
            hand_number = self.total_hands_dealt + 1,
            cards_remaining = self.shoe.cards_remaining(),
            "round dealt"
        );

        if all_complete {
            // Every hand is a natural; no player turn, no dealer draws.
            self.finish_round()?;
        } else {
            self.phase = RoundPhase::PlayerTurn;
        }

        Ok(self.round_snapshot())
    }

    fn round_snapshot(&self) -> RoundSnapshot {
        let round = self
            .round
            .as_ref()
            .expect("round was just created by deal_round");
        RoundSnapshot {
            dealer_up: round
                .dealer
                .up_card()
                .expect("dealer was dealt two cards"),
            hands: round
                .seats
                .iter()
                .flat_map(|seat| {
                    seat.hands
                        .iter()
                        .map(|hand| HandSnapshot::of(&seat.player_id, hand))
                })
                .collect(),
            phase: self.phase,
        }
    }
}
