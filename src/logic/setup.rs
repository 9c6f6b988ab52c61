//! Game setup: decks, opening hands and the mulligan.

use tracing::{debug, info};

use crate::core::{EngineError, EntityId, GameState, Team, TeamMap};
use crate::rules::Phase;
use crate::zones::{Zone, ZonePosition};

impl GameState {
    /// Build both decks from card codes, shuffle them, pick the starting
    /// team and deal opening hands. The game waits in the mulligan phase.
    pub fn setup(&mut self, decks: &TeamMap<Vec<String>>) -> Result<(), EngineError> {
        for (team, codes) in decks.iter() {
            for code in codes {
                let card = self.create_card(code, team, None)?;
                self.move_card(card, Zone::Deck, ZonePosition::Top)?;
            }
            self.rng.shuffle(&mut self.boards[team].deck);
            self.sync_positions(team, Zone::Deck);
        }

        self.starting_team = if self.rng.gen_bool(0.5) {
            Team::Blue
        } else {
            Team::Red
        };
        self.initiative = self.starting_team;

        let hand_size = self.config.initial_hand_size;
        for team in Team::ALL {
            let available = self.boards[team].deck.len();
            if available < hand_size {
                return Err(EngineError::DeckUnderflow {
                    team,
                    requested: hand_size,
                    available,
                });
            }
            for _ in 0..hand_size {
                if let Some(&card) = self.boards[team].deck.last() {
                    self.move_card(card, Zone::Hand, ZonePosition::Top)?;
                    self.refresh_subscriptions(card)?;
                }
            }
        }

        self.phase = Phase::Mulligan;
        self.mulligan_done = TeamMap::with_value(false);
        info!("Game set up, {} starts", self.starting_team);
        Ok(())
    }

    /// Replace the flagged hand cards with cards from the top of the deck.
    ///
    /// Each replacement takes the hand index of the card it replaces. The
    /// rest of the deck is then reshuffled and the originals are buried
    /// under at least `initial_hand_size` cards, so none of them can be
    /// drawn again before that many draws. Once both teams are done the
    /// first round starts.
    pub fn mulligan(&mut self, team: Team, replace: &[bool]) -> Result<(), EngineError> {
        let flagged: Vec<usize> = replace
            .iter()
            .enumerate()
            .filter(|(_, &flag)| flag)
            .map(|(index, _)| index)
            .collect();

        let deck = &self.boards[team].deck;
        if flagged.len() > deck.len() {
            return Err(EngineError::DeckUnderflow {
                team,
                requested: flagged.len(),
                available: deck.len(),
            });
        }
        let replacements: Vec<EntityId> = deck.iter().rev().take(flagged.len()).copied().collect();

        let mut originals = Vec::with_capacity(flagged.len());
        for (&index, &replacement) in flagged.iter().zip(&replacements) {
            let original = *self.boards[team]
                .hand
                .get(index)
                .ok_or(EngineError::MissingPending("mulligan hand card"))?;
            self.unsubscribe_all(original)?;
            self.move_card(original, Zone::Deck, ZonePosition::Bottom)?;
            self.move_card(replacement, Zone::Hand, ZonePosition::Index(index))?;
            self.refresh_subscriptions(replacement)?;
            originals.push(original);
        }

        if !originals.is_empty() {
            let deck = &mut self.boards[team].deck;
            deck.retain(|card| !originals.contains(card));
            self.rng.shuffle(deck);
            let depth = deck.len().saturating_sub(self.config.initial_hand_size);
            for &card in &originals {
                let at = self.rng.gen_range_usize(0..depth + 1);
                deck.insert(at, card);
            }
            self.sync_positions(team, Zone::Deck);
        }

        self.mulligan_done[team] = true;
        debug!("{} replaced {} cards", team, flagged.len());

        if Team::ALL.into_iter().all(|t| self.mulligan_done[t]) {
            self.phase = Phase::Idle;
            self.start_round()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{Config, EngineError, GameState, Team, TeamMap};
    use crate::rules::Phase;

    fn state() -> GameState {
        let catalogue = CardRegistry::new()
            .with(CardDefinition::unit("A", "Alpha", 1, 1, 1))
            .with(CardDefinition::unit("B", "Beta", 2, 2, 2));
        GameState::new(Config::default(), Rc::new(catalogue), 21)
    }

    fn decks(size: usize) -> TeamMap<Vec<String>> {
        TeamMap::new(|_| (0..size).map(|i| if i % 2 == 0 { "A" } else { "B" }.to_string()).collect())
    }

    #[test]
    fn test_setup_deals_hands() {
        let mut state = state();
        state.setup(&decks(10)).unwrap();

        for team in Team::ALL {
            assert_eq!(state.boards[team].hand.len(), 4);
            assert_eq!(state.boards[team].deck.len(), 6);
        }
        assert_eq!(state.phase, Phase::Mulligan);
        assert_eq!(state.initiative, state.starting_team);
        assert!(state.verify_zones().is_ok());
        assert_eq!(state.events().count(), 0);
    }

    #[test]
    fn test_short_deck_underflows() {
        let mut state = state();
        let err = state.setup(&decks(3));
        assert!(matches!(err, Err(EngineError::DeckUnderflow { requested: 4, .. })));
    }

    #[test]
    fn test_both_mulligans_start_round_one() {
        let mut state = state();
        state.setup(&decks(10)).unwrap();

        state.mulligan(Team::Blue, &[false; 4]).unwrap();
        assert_eq!(state.phase, Phase::Mulligan);
        state.mulligan(Team::Red, &[true, true, true, true]).unwrap();

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.round, 1);
        assert_eq!(state.boards[Team::Red].hand.len(), 5);
        assert!(state.verify_zones().is_ok());
    }

    #[test]
    fn test_mulligan_buries_originals() {
        let mut state = state();
        state.setup(&decks(20)).unwrap();
        let hand = state.boards[Team::Blue].hand.clone();

        state.mulligan(Team::Blue, &[true, true, false, false]).unwrap();

        let deck = &state.boards[Team::Blue].deck;
        assert_eq!(deck.len(), 16);
        let buried_under = |card| deck.len() - 1 - deck.iter().position(|&id| id == card).unwrap();
        assert!(buried_under(hand[0]) >= 4);
        assert!(buried_under(hand[1]) >= 4);
        assert_eq!(state.boards[Team::Blue].hand[2..], hand[2..]);
        assert!(state.verify_zones().is_ok());
    }
}
