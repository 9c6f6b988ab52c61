//! Engine configuration.
//!
//! `Config` holds every numeric limit the rules consult: board sizes, mana
//! caps, hand and deck limits, round cap and the invalid-action retry bound.
//! Loading a configuration from disk is left to the embedding application;
//! any field missing from a serialized config falls back to its default.
//!
//! ```
//! use lor_engine::core::Config;
//!
//! let config = Config::default().with_camp_size(4).with_max_rounds(10);
//! assert_eq!(config.camp_size, 4);
//! assert_eq!(config.battlefield_size, 6);
//! ```

use serde::{Deserialize, Serialize};

/// Numeric limits gating validity checks and round bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum field cards a team may hold in camp.
    pub camp_size: usize,
    /// Number of battlefield lanes per team.
    pub battlefield_size: usize,
    /// Maximum cards in hand; further draws are obliterated.
    pub hand_cards_limit: usize,
    pub start_nexus_health: i32,
    /// Mana gem cap.
    pub max_mana: i32,
    /// Spell-only mana carried between rounds.
    pub max_floating_mana: i32,
    pub initial_hand_size: usize,
    /// After this many rounds the game is a tie.
    pub max_rounds: u32,
    /// Rejected controller actions tolerated before a fallback is used.
    pub invalid_actions_limit: u32,
    /// Mana gems needed to become enlightened.
    pub enlightenment_threshold: i32,
    pub deck_cards_limit: usize,
    pub max_card_copies_in_deck: usize,
    pub champions_limit: usize,
    pub regions_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camp_size: 6,
            battlefield_size: 6,
            hand_cards_limit: 10,
            start_nexus_health: 20,
            max_mana: 10,
            max_floating_mana: 3,
            initial_hand_size: 4,
            max_rounds: 40,
            invalid_actions_limit: 5,
            enlightenment_threshold: 10,
            deck_cards_limit: 40,
            max_card_copies_in_deck: 3,
            champions_limit: 6,
            regions_limit: 2,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_camp_size(mut self, size: usize) -> Self {
        self.camp_size = size;
        self
    }

    #[must_use]
    pub fn with_battlefield_size(mut self, size: usize) -> Self {
        self.battlefield_size = size;
        self
    }

    #[must_use]
    pub fn with_hand_cards_limit(mut self, limit: usize) -> Self {
        self.hand_cards_limit = limit;
        self
    }

    #[must_use]
    pub fn with_start_nexus_health(mut self, health: i32) -> Self {
        self.start_nexus_health = health;
        self
    }

    #[must_use]
    pub fn with_max_mana(mut self, mana: i32) -> Self {
        self.max_mana = mana;
        self
    }

    #[must_use]
    pub fn with_max_floating_mana(mut self, mana: i32) -> Self {
        self.max_floating_mana = mana;
        self
    }

    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_invalid_actions_limit(mut self, limit: u32) -> Self {
        self.invalid_actions_limit = limit;
        self
    }

    #[must_use]
    pub fn with_enlightenment_threshold(mut self, threshold: i32) -> Self {
        self.enlightenment_threshold = threshold;
        self
    }

    /// Set the deck-building limits in one go.
    #[must_use]
    pub fn with_deck_limits(
        mut self,
        cards: usize,
        copies: usize,
        champions: usize,
        regions: usize,
    ) -> Self {
        self.deck_cards_limit = cards;
        self.max_card_copies_in_deck = copies;
        self.champions_limit = champions;
        self.regions_limit = regions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.camp_size, 6);
        assert_eq!(config.hand_cards_limit, 10);
        assert_eq!(config.start_nexus_health, 20);
        assert_eq!(config.max_floating_mana, 3);
        assert_eq!(config.invalid_actions_limit, 5);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_battlefield_size(3)
            .with_deck_limits(20, 2, 1, 1);

        assert_eq!(config.battlefield_size, 3);
        assert_eq!(config.deck_cards_limit, 20);
        assert_eq!(config.regions_limit, 1);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"camp_size": 2}"#).unwrap();
        assert_eq!(config.camp_size, 2);
        assert_eq!(config.max_rounds, 40);
    }
}
