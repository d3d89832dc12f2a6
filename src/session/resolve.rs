//! Dealer play and round resolution.

use crate::error::ShoeError;
use crate::hand::HandStatus;
use crate::policy::dealer_should_hit;
use crate::record::{DealerRecord, HandRecord, PlayerRoundRecord, RoundRecord};
use crate::resolver::resolve_hand;
use crate::session::state::RoundPhase;

use super::Session;

impl Session {
    /// Plays out the dealer and settles every hand.
    ///
    /// Reached once no player hand is open: the hole card is revealed, the
    /// dealer draws under the house rule while at least one hand stands (a
    /// dealer blackjack never draws, and neither does a table of busts,
    /// surrenders, and naturals), and the round resolver fixes each hand's
    /// outcome. Payouts are credited, the round record is appended, and the
    /// phase lands on `Resolved`.
    pub(crate) fn finish_round(&mut self) -> Result<(), ShoeError> {
        self.phase = RoundPhase::DealerTurn;

        let must_draw = {
            let round = self
                .round
                .as_mut()
                .expect("finish_round is only reached with a dealt round");
            round.active = None;
            round.dealer.reveal_hole();
            tracing::debug!(total = round.dealer.value().total, "hole card revealed");

            !round.dealer.is_blackjack()
                && round
                    .seats
                    .iter()
                    .flat_map(|seat| seat.hands.iter())
                    .any(|hand| hand.status() == HandStatus::Stand)
        };

        if must_draw {
            let hit_soft17 = self.settings.dealer_hits_soft17;
            loop {
                let should_hit = {
                    let round = self
                        .round
                        .as_ref()
                        .expect("finish_round is only reached with a dealt round");
                    !round.dealer.is_bust()
                        && dealer_should_hit(round.dealer.cards(), hit_soft17)
                };
                if !should_hit {
                    break;
                }

                let card = self.draw()?;
                let round = self
                    .round
                    .as_mut()
                    .expect("finish_round is only reached with a dealt round");
                round.dealer.add_card(card);
                tracing::debug!(card = %card, total = round.dealer.value().total, "dealer hits");
            }
        }

        self.settle();
        Ok(())
    }

    fn settle(&mut self) {
        let payout_blackjack = self.settings.payout_blackjack;
        let hand_number = self.total_hands_dealt + 1;

        let (record, credits) = {
            let round = self
                .round
                .as_ref()
                .expect("finish_round is only reached with a dealt round");

            let dealer = DealerRecord {
                up_card: round
                    .dealer
                    .up_card()
                    .expect("dealer was dealt two cards"),
                hole_card: round
                    .dealer
                    .hole_card()
                    .expect("dealer was dealt two cards"),
                final_hand: round.dealer.cards().to_vec(),
                hand_value: round.dealer.value().total,
                busted: round.dealer.is_bust(),
            };

            let mut player_actions = Vec::with_capacity(round.seats.len());
            let mut credits: Vec<(String, i64)> = Vec::with_capacity(round.seats.len());

            for seat in &round.seats {
                let mut hands = Vec::with_capacity(seat.hands.len());
                let mut total_bet: u32 = 0;
                let mut total_payout: u32 = 0;
                let mut credit: i64 = 0;

                for (index, hand) in seat.hands.iter().enumerate() {
                    let resolution = resolve_hand(hand, &round.dealer, payout_blackjack);
                    total_bet += hand.bet();
                    total_payout += resolution.payout;
                    // Surrender refunds were credited at action time.
                    if hand.status() != HandStatus::Surrendered {
                        credit += i64::from(resolution.payout);
                    }

                    hands.push(HandRecord {
                        hand_index: index as u32,
                        cards: hand.cards().to_vec(),
                        actions: hand.actions().to_vec(),
                        final_value: hand.value().total,
                        busted: hand.is_busted(),
                        blackjack: hand.is_blackjack(),
                        outcome: resolution.outcome,
                        payout: resolution.payout,
                    });
                }

                let net_result = i64::from(total_payout) - i64::from(total_bet);
                credits.push((seat.player_id.clone(), credit));

                player_actions.push(PlayerRoundRecord {
                    player_id: seat.player_id.clone(),
                    position: seat.position.clone(),
                    initial_cards: seat.initial_cards,
                    bet: seat.bet,
                    insurance_bet: 0,
                    hands,
                    total_bet,
                    total_payout,
                    net_result,
                });
            }

            (
                RoundRecord {
                    hand_number,
                    dealer,
                    player_actions,
                    deck_state: round.deck_state.clone(),
                },
                credits,
            )
        };

        for (player_id, credit) in credits {
            if let Some(stack) = self.bankroll_mut(&player_id) {
                *stack += credit;
            }
        }

        for action in &record.player_actions {
            tracing::info!(
                hand_number,
                player = %action.player_id,
                net = action.net_result,
                "round resolved"
            );
        }

        self.history.push(record);
        self.total_hands_dealt += 1;
        self.phase = RoundPhase::Resolved;
    }
}
