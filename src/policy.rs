//! Dealer drawing policy.

use crate::card::Card;
use crate::hand::hand_value;

/// Whether the dealer must draw another card.
///
/// Below 17 the dealer always hits, above 17 always stands. On exactly 17 the
/// dealer hits only when the hand is soft and the house hits soft 17.
#[must_use]
pub fn dealer_should_hit(cards: &[Card], hit_soft_17: bool) -> bool {
    let value = hand_value(cards);
    if value.total < 17 {
        return true;
    }
    if value.total > 17 {
        return false;
    }
    value.soft && hit_soft_17
}
