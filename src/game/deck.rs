//! Deck lists and deck-building rules.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardCatalogue;
use crate::core::Config;

/// Why a deck list breaks the deck-building rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck has {count} cards, the limit is {limit}")]
    TooManyCards { count: usize, limit: usize },

    #[error("deck has {count} copies of {code}, the limit is {limit}")]
    TooManyCopies {
        code: String,
        count: usize,
        limit: usize,
    },

    #[error("deck has {count} champions, the limit is {limit}")]
    TooManyChampions { count: usize, limit: usize },

    #[error("deck spans {count} regions, the limit is {limit}")]
    TooManyRegions { count: usize, limit: usize },

    #[error("no card with code {0:?} in the catalogue")]
    UnknownCard(String),

    #[error("{0} cannot be put in a deck")]
    Uncollectible(String),
}

/// Card codes making up a deck, in no particular order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub codes: Vec<String>,
}

impl DeckList {
    #[must_use]
    pub fn new<S: Into<String>>(codes: impl IntoIterator<Item = S>) -> Self {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// `count` copies of each listed code.
    #[must_use]
    pub fn copies(codes: &[&str], count: usize) -> Self {
        Self::new(
            codes
                .iter()
                .flat_map(|&code| std::iter::repeat(code).take(count)),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Check the list against the catalogue and the deck limits.
    pub fn validate(&self, config: &Config, catalogue: &dyn CardCatalogue) -> Result<(), DeckError> {
        if self.codes.len() > config.deck_cards_limit {
            return Err(DeckError::TooManyCards {
                count: self.codes.len(),
                limit: config.deck_cards_limit,
            });
        }

        let mut copies: FxHashMap<&str, usize> = FxHashMap::default();
        let mut regions = FxHashSet::default();
        let mut champions = 0;

        for code in &self.codes {
            let definition = catalogue
                .definition(code)
                .ok_or_else(|| DeckError::UnknownCard(code.clone()))?;
            if !definition.collectible {
                return Err(DeckError::Uncollectible(code.clone()));
            }

            let count = copies.entry(code.as_str()).or_default();
            *count += 1;
            if *count > config.max_card_copies_in_deck {
                return Err(DeckError::TooManyCopies {
                    code: code.clone(),
                    count: *count,
                    limit: config.max_card_copies_in_deck,
                });
            }

            if definition.is_champion() {
                champions += 1;
            }
            if !definition.region.is_empty() {
                regions.insert(definition.region.clone());
            }
        }

        if champions > config.champions_limit {
            return Err(DeckError::TooManyChampions {
                count: champions,
                limit: config.champions_limit,
            });
        }
        if regions.len() > config.regions_limit {
            return Err(DeckError::TooManyRegions {
                count: regions.len(),
                limit: config.regions_limit,
            });
        }
        Ok(())
    }
}
