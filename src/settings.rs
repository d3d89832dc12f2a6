//! Table rules configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// House rules for a blackjack table.
///
/// Loaded from a JSON rules file and validated before a session starts; the
/// session freezes its own copy so later edits to the source configuration
/// cannot affect a round in progress.
///
/// ```
/// use twentyone::GameSettings;
///
/// let settings = GameSettings::default()
///     .with_num_of_decks(6)
///     .with_bet_bounds(10, 500);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Always `"Blackjack"`.
    pub game_type: String,
    /// Smallest bet the table accepts.
    pub min_bet: u32,
    /// Largest bet the table accepts.
    pub max_bet: u32,
    /// Whether the dealer hits a soft 17.
    pub dealer_hits_soft17: bool,
    /// Number of decks in the shoe (1..=8).
    pub num_of_decks: u8,
    /// Whether surrender is offered.
    pub allow_surrender: bool,
    /// Whether doubling down is allowed on split hands.
    pub allow_double_after_split: bool,
    /// Whether split aces may be split again.
    pub allow_resplit_aces: bool,
    /// Maximum number of splits per original hand (0..=4).
    pub max_splits: u8,
    /// Whether insurance is offered. Parsed and recorded but reserved; no
    /// insurance wager is currently offered or settled.
    pub insurance_allowed: bool,
    /// Blackjack bonus as a multiple of the bet (typically 1.5).
    pub payout_blackjack: f64,
    /// Free-form reshuffle note carried through from the rules file.
    pub shuffle_frequency: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            game_type: "Blackjack".to_owned(),
            min_bet: 10,
            max_bet: 500,
            dealer_hits_soft17: true,
            num_of_decks: 6,
            allow_surrender: true,
            allow_double_after_split: true,
            allow_resplit_aces: false,
            max_splits: 3,
            insurance_allowed: false,
            payout_blackjack: 1.5,
            shuffle_frequency: "below 20 cards".to_owned(),
        }
    }
}

impl GameSettings {
    /// Sets the bet bounds.
    #[must_use]
    pub const fn with_bet_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_bet = min;
        self.max_bet = max;
        self
    }

    /// Sets the number of decks.
    #[must_use]
    pub const fn with_num_of_decks(mut self, decks: u8) -> Self {
        self.num_of_decks = decks;
        self
    }

    /// Sets whether the dealer hits a soft 17.
    #[must_use]
    pub const fn with_dealer_hits_soft17(mut self, hits: bool) -> Self {
        self.dealer_hits_soft17 = hits;
        self
    }

    /// Sets whether surrender is offered.
    #[must_use]
    pub const fn with_allow_surrender(mut self, allowed: bool) -> Self {
        self.allow_surrender = allowed;
        self
    }

    /// Sets the maximum number of splits.
    #[must_use]
    pub const fn with_max_splits(mut self, max_splits: u8) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// Sets the blackjack bonus multiplier.
    #[must_use]
    pub const fn with_payout_blackjack(mut self, payout: f64) -> Self {
        self.payout_blackjack = payout;
        self
    }

    /// Checks the settings against the table contract.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.game_type != "Blackjack" {
            return Err(SettingsError::InvalidGameType);
        }
        if self.min_bet == 0 {
            return Err(SettingsError::InvalidMinBet);
        }
        if self.max_bet <= self.min_bet {
            return Err(SettingsError::InvalidMaxBet);
        }
        if !(1..=8).contains(&self.num_of_decks) {
            return Err(SettingsError::InvalidNumOfDecks);
        }
        if self.payout_blackjack <= 0.0 {
            return Err(SettingsError::InvalidPayoutBlackjack);
        }
        if self.max_splits > 4 {
            return Err(SettingsError::InvalidMaxSplits);
        }
        Ok(())
    }
}

/// Loads and validates game settings from a JSON rules file.
pub fn load_settings(path: impl AsRef<Path>) -> Result<GameSettings, SettingsError> {
    let text = std::fs::read_to_string(path)?;
    let settings: GameSettings = serde_json::from_str(&text)?;
    settings.validate()?;
    tracing::debug!(decks = settings.num_of_decks, "game settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let base = GameSettings::default;

        let mut s = base();
        s.game_type = "Poker".to_owned();
        assert!(matches!(s.validate(), Err(SettingsError::InvalidGameType)));

        assert!(matches!(
            base().with_bet_bounds(0, 500).validate(),
            Err(SettingsError::InvalidMinBet)
        ));
        assert!(matches!(
            base().with_bet_bounds(100, 100).validate(),
            Err(SettingsError::InvalidMaxBet)
        ));
        assert!(matches!(
            base().with_num_of_decks(9).validate(),
            Err(SettingsError::InvalidNumOfDecks)
        ));
        assert!(matches!(
            base().with_payout_blackjack(0.0).validate(),
            Err(SettingsError::InvalidPayoutBlackjack)
        ));
        assert!(matches!(
            base().with_max_splits(5).validate(),
            Err(SettingsError::InvalidMaxSplits)
        ));
    }

    #[test]
    fn settings_serialize_with_camel_case_keys() {
        let value = serde_json::to_value(GameSettings::default()).expect("serializes");
        let object = value.as_object().expect("object");
        for key in [
            "gameType",
            "minBet",
            "maxBet",
            "dealerHitsSoft17",
            "numOfDecks",
            "allowSurrender",
            "allowDoubleAfterSplit",
            "allowResplitAces",
            "maxSplits",
            "insuranceAllowed",
            "payoutBlackjack",
            "shuffleFrequency",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }
}
