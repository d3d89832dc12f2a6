//! Session integration tests.
//!
//! Every test rigs the shoe with an exact draw order: dealer up card, dealer
//! hole card, then two cards per player in seat order, then any hit cards.

use std::collections::VecDeque;

use twentyone::{
    Action, ActionError, BetError, Card, GameSettings, HandSnapshot, HandStatus, Outcome, Player,
    RoundPhase, Session, Shoe, Suit, TableEvent, TableIo,
};

const fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

/// Builds a session for `players` whose shoe deals exactly `draws`, padded
/// with filler so the deal does not trip the reshuffle threshold.
fn rigged_session(settings: GameSettings, players: Vec<Player>, draws: &[Card]) -> Session {
    let mut deck = draws.to_vec();
    while deck.len() < 30 {
        deck.push(card(Suit::Clubs, 4));
    }

    let mut session = Session::new(settings, players, 1).expect("settings are valid");
    session.replace_shoe(Shoe::rigged(deck));
    session
}

fn one_player_session(draws: &[Card]) -> Session {
    rigged_session(
        GameSettings::default(),
        vec![Player::new("player1", "Ada", 10_000)],
        draws,
    )
}

fn stack(session: &Session, player_id: &str) -> i64 {
    session
        .players()
        .iter()
        .find(|p| p.player_id == player_id)
        .expect("player is seated")
        .current_stack_size
}

#[test]
fn natural_blackjack_resolves_without_a_player_turn() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 7),
        card(Suit::Clubs, 9),
        card(Suit::Hearts, 1),
        card(Suit::Spades, 13),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    assert_eq!(stack(&session, "player1"), 9_990);

    let snapshot = session.deal_round().expect("deal succeeds");
    assert_eq!(snapshot.phase, RoundPhase::Resolved);
    assert_eq!(snapshot.hands[0].status, HandStatus::Blackjack);
    assert_eq!(session.current_hand(), None);
    assert_eq!(session.total_hands_dealt(), 1);

    let record = session.last_round().expect("round is in the history");
    // Dealer sat on 16 but never draws against a lone natural.
    assert_eq!(record.dealer.final_hand.len(), 2);

    let seat = &record.player_actions[0];
    assert_eq!(seat.hands[0].outcome, Outcome::Blackjack);
    assert_eq!(seat.hands[0].payout, 25);
    assert_eq!(seat.net_result, 15);
    assert_eq!(stack(&session, "player1"), 10_015);
}

#[test]
fn hit_then_stand_and_dealer_draws_to_seventeen() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 7),
        card(Suit::Clubs, 9),
        card(Suit::Hearts, 5),
        card(Suit::Spades, 9),
        card(Suit::Clubs, 6),
        card(Suit::Diamonds, 2),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    let snapshot = session.deal_round().expect("deal succeeds");
    assert_eq!(snapshot.phase, RoundPhase::PlayerTurn);
    assert_eq!(snapshot.dealer_up, card(Suit::Diamonds, 7));

    let hand = session.current_hand().expect("a hand is active");
    let updated = session.act(hand, Action::Hit).expect("hit is legal");
    assert_eq!(updated.value.total, 20);
    assert_eq!(updated.status, HandStatus::Active);

    session.act(hand, Action::Stand).expect("stand is legal");
    assert_eq!(session.phase(), RoundPhase::Resolved);

    let record = session.last_round().expect("round is in the history");
    // Dealer drew 16 -> 18 and stood.
    assert_eq!(record.dealer.hand_value, 18);
    assert_eq!(record.dealer.final_hand.len(), 3);

    let seat = &record.player_actions[0];
    assert_eq!(seat.hands[0].outcome, Outcome::Win);
    assert_eq!(seat.hands[0].actions, vec![Action::Hit, Action::Stand]);
    assert_eq!(seat.net_result, 10);
    assert_eq!(stack(&session, "player1"), 10_010);
}

#[test]
fn split_plays_two_hands_against_one_dealer() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 7),
        card(Suit::Clubs, 8),
        card(Suit::Diamonds, 8),
        card(Suit::Hearts, 3),
        card(Suit::Spades, 2),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let first = session.current_hand().expect("a hand is active");
    assert!(session.legal_actions(first).contains(&Action::Split));

    let updated = session.act(first, Action::Split).expect("split is legal");
    assert_eq!(updated.cards, vec![card(Suit::Clubs, 8), card(Suit::Hearts, 3)]);
    // The second stake came off the bankroll at split time.
    assert_eq!(stack(&session, "player1"), 9_980);

    // First hand still to act; its identifier is unchanged by the split.
    assert_eq!(session.current_hand(), Some(first));
    session.act(first, Action::Stand).expect("stand is legal");

    let second = session.current_hand().expect("the split hand is next");
    assert_ne!(second, first);
    let view = session.hand_snapshot(second).expect("hand exists");
    assert_eq!(view.cards, vec![card(Suit::Diamonds, 8), card(Suit::Spades, 2)]);

    session.act(second, Action::Stand).expect("stand is legal");
    assert_eq!(session.phase(), RoundPhase::Resolved);

    let seat = &session.last_round().expect("round is in the history").player_actions[0];
    assert_eq!(seat.hands.len(), 2);
    assert_eq!(seat.hands[0].hand_index, 0);
    assert_eq!(seat.hands[1].hand_index, 1);
    assert_eq!(seat.total_bet, 20);
    // 11 and 10 both lose to the dealer's 17.
    assert_eq!(seat.hands[0].outcome, Outcome::Loss);
    assert_eq!(seat.hands[1].outcome, Outcome::Loss);
    assert_eq!(seat.net_result, -20);
    assert_eq!(stack(&session, "player1"), 9_980);
}

#[test]
fn both_halves_of_a_split_resolve_symmetrically() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 8),
        card(Suit::Hearts, 1),
        card(Suit::Spades, 1),
        card(Suit::Clubs, 13),
        card(Suit::Diamonds, 13),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let first = session.current_hand().expect("a hand is active");
    session.act(first, Action::Split).expect("split is legal");

    // Each half drew a king: 21 on two cards either way, but neither is a
    // natural, so the round settles at once with identical plain wins.
    assert_eq!(session.phase(), RoundPhase::Resolved);

    let seat = &session.last_round().expect("round is in the history").player_actions[0];
    assert_eq!(seat.hands.len(), 2);
    for hand in &seat.hands {
        assert_eq!(hand.final_value, 21);
        assert!(!hand.blackjack);
        assert_eq!(hand.outcome, Outcome::Win);
        assert_eq!(hand.payout, 20);
    }
    assert_eq!(seat.net_result, 20);
    assert_eq!(stack(&session, "player1"), 10_020);
}

#[test]
fn surrender_refunds_half_the_bet_immediately() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 6),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 7),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let hand = session.current_hand().expect("a hand is active");
    assert!(session.legal_actions(hand).contains(&Action::Surrender));

    session.act(hand, Action::Surrender).expect("surrender is legal");
    assert_eq!(session.phase(), RoundPhase::Resolved);
    assert_eq!(stack(&session, "player1"), 9_995);

    let record = session.last_round().expect("round is in the history");
    // Dealer's 16 stays put; nothing stands against it.
    assert_eq!(record.dealer.final_hand.len(), 2);

    let seat = &record.player_actions[0];
    assert_eq!(seat.hands[0].outcome, Outcome::Surrender);
    assert_eq!(seat.hands[0].payout, 5);
    assert_eq!(seat.net_result, -5);
}

#[test]
fn double_down_takes_exactly_one_card_at_twice_the_bet() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 7),
        card(Suit::Hearts, 5),
        card(Suit::Spades, 6),
        card(Suit::Spades, 10),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let hand = session.current_hand().expect("a hand is active");
    assert!(session.legal_actions(hand).contains(&Action::Double));

    let updated = session.act(hand, Action::Double).expect("double is legal");
    assert_eq!(updated.cards.len(), 3);
    assert_eq!(updated.bet, 20);
    assert_eq!(session.phase(), RoundPhase::Resolved);

    let seat = &session.last_round().expect("round is in the history").player_actions[0];
    assert_eq!(seat.hands[0].actions, vec![Action::Double]);
    assert_eq!(seat.hands[0].final_value, 21);
    assert_eq!(seat.hands[0].outcome, Outcome::Win);
    assert_eq!(seat.hands[0].payout, 40);
    // 10_000 - 10 - 10 + 40
    assert_eq!(stack(&session, "player1"), 10_020);
}

#[test]
fn bet_validation_and_duplicate_rejection() {
    let settings = GameSettings::default();
    let players = vec![
        Player::new("player1", "Ada", 10_000),
        Player::new("shortstack", "Bo", 50),
    ];
    let mut session = rigged_session(settings, players, &[]);

    assert_eq!(
        session.place_bet("player1", 5),
        Err(BetError::OutOfRange { min: 10, max: 500 })
    );
    assert_eq!(
        session.place_bet("player1", 600),
        Err(BetError::OutOfRange { min: 10, max: 500 })
    );
    assert_eq!(
        session.place_bet("nobody", 10),
        Err(BetError::UnknownPlayer)
    );
    assert_eq!(
        session.place_bet("shortstack", 100),
        Err(BetError::InsufficientFunds)
    );

    session.place_bet("player1", 10).expect("bet is accepted");
    assert_eq!(session.place_bet("player1", 10), Err(BetError::AlreadyPlaced));

    // Rejections never touched the bankrolls.
    assert_eq!(stack(&session, "player1"), 9_990);
    assert_eq!(stack(&session, "shortstack"), 50);
}

#[test]
fn illegal_action_is_rejected_without_mutation() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 7),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 7),
        card(Suit::Clubs, 2),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let hand = session.current_hand().expect("a hand is active");
    let before = session.hand_snapshot(hand).expect("hand exists");

    // 9 and 7 is not a splittable pair.
    let err = session.act(hand, Action::Split).expect_err("split is illegal");
    assert_eq!(err, ActionError::IllegalAction);

    let after = session.hand_snapshot(hand).expect("hand exists");
    assert_eq!(after.cards, before.cards);
    assert_eq!(stack(&session, "player1"), 9_990);
    assert_eq!(session.phase(), RoundPhase::PlayerTurn);

    session.act(hand, Action::Hit).expect("hit is still legal");
}

#[test]
fn shoe_is_rebuilt_below_the_threshold() {
    let mut session = one_player_session(&[]);
    // Ten cards is under the 20-card threshold.
    session.replace_shoe(Shoe::rigged(vec![card(Suit::Clubs, 4); 10]));
    assert!(session.needs_reshuffle());

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    // A fresh six-deck shoe minus the four cards just dealt.
    assert_eq!(session.cards_remaining(), 6 * 52 - 4);
}

#[test]
fn abandoning_a_round_returns_every_stake() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 6),
        card(Suit::Hearts, 9),
        card(Suit::Spades, 7),
    ]);

    session.place_bet("player1", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");
    assert_eq!(stack(&session, "player1"), 9_990);

    session.abandon_round();
    assert_eq!(stack(&session, "player1"), 10_000);
    assert_eq!(session.phase(), RoundPhase::Betting);
    assert_eq!(session.total_hands_dealt(), 0);
    assert!(session.last_round().is_none());
}

#[test]
fn seats_play_in_order_and_settle_independently() {
    let players = vec![
        Player::new("player1", "Ada", 10_000),
        Player::new("player2", "Bo", 10_000),
    ];
    let mut session = rigged_session(
        GameSettings::default(),
        players,
        &[
            card(Suit::Diamonds, 9),
            card(Suit::Clubs, 9),
            card(Suit::Hearts, 10),
            card(Suit::Spades, 10),
            card(Suit::Clubs, 10),
            card(Suit::Diamonds, 6),
            card(Suit::Hearts, 2),
        ],
    );

    session.place_bet("player1", 10).expect("bet is accepted");
    session.place_bet("player2", 10).expect("bet is accepted");
    session.deal_round().expect("deal succeeds");

    let first = session.current_hand().expect("a hand is active");
    assert_eq!(
        session.hand_snapshot(first).expect("hand exists").player_id,
        "player1"
    );
    session.act(first, Action::Stand).expect("stand is legal");

    let second = session.current_hand().expect("second seat is next");
    assert_eq!(
        session.hand_snapshot(second).expect("hand exists").player_id,
        "player2"
    );
    session.act(second, Action::Hit).expect("hit is legal");
    session.act(second, Action::Stand).expect("stand is legal");

    assert_eq!(session.phase(), RoundPhase::Resolved);
    let record = session.last_round().expect("round is in the history");
    assert_eq!(record.dealer.hand_value, 18);
    assert_eq!(record.player_actions[0].hands[0].outcome, Outcome::Win);
    assert_eq!(record.player_actions[1].hands[0].outcome, Outcome::Push);
    assert_eq!(stack(&session, "player1"), 10_010);
    assert_eq!(stack(&session, "player2"), 10_000);
}

/// A front-end that plays from fixed scripts.
struct Scripted {
    bets: VecDeque<u32>,
    actions: VecDeque<Action>,
    dealt: u32,
    resolved: u32,
}

impl Scripted {
    fn new(bets: &[u32], actions: &[Action]) -> Self {
        Self {
            bets: bets.iter().copied().collect(),
            actions: actions.iter().copied().collect(),
            dealt: 0,
            resolved: 0,
        }
    }
}

impl TableIo for Scripted {
    fn prompt_bet(&mut self, _player: &Player, _min_bet: u32, _max_bet: u32) -> Option<u32> {
        self.bets.pop_front()
    }

    fn prompt_action(&mut self, _hand: &HandSnapshot, legal: &[Action]) -> Option<Action> {
        let action = self.actions.pop_front()?;
        assert!(legal.contains(&action), "script offered an illegal action");
        Some(action)
    }

    fn render(&mut self, event: TableEvent<'_>) {
        match event {
            TableEvent::Dealt(_) => self.dealt += 1,
            TableEvent::Resolved(_) => self.resolved += 1,
            _ => {}
        }
    }
}

#[test]
fn play_round_drives_a_full_round_through_the_capability_trait() {
    let mut session = one_player_session(&[
        card(Suit::Diamonds, 10),
        card(Suit::Clubs, 7),
        card(Suit::Hearts, 10),
        card(Suit::Spades, 9),
    ]);

    let mut io = Scripted::new(&[10], &[Action::Stand]);
    let finished = session.play_round(&mut io).expect("round runs to the end");

    assert!(finished);
    assert_eq!(io.dealt, 1);
    assert_eq!(io.resolved, 1);
    assert_eq!(session.total_hands_dealt(), 1);
    assert_eq!(stack(&session, "player1"), 10_010);
}

#[test]
fn quitting_at_the_bet_prompt_abandons_cleanly() {
    let mut session = one_player_session(&[]);

    let mut io = Scripted::new(&[], &[]);
    let finished = session.play_round(&mut io).expect("quit is not an error");

    assert!(!finished);
    assert_eq!(session.phase(), RoundPhase::Betting);
    assert_eq!(session.total_hands_dealt(), 0);
    assert_eq!(stack(&session, "player1"), 10_000);
}
