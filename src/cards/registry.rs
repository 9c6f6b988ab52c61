//! Card catalogue and registry.
//!
//! The engine only needs one capability from the card gallery: given a
//! code, produce the definition. [`CardCatalogue`] is that seam;
//! [`CardRegistry`] is the in-memory implementation used by tests and by
//! embedders that build their gallery in code.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::definition::CardDefinition;

/// Source of card definitions keyed by code.
pub trait CardCatalogue {
    /// Look up a definition; `None` when the code is unknown.
    fn definition(&self, code: &str) -> Option<Rc<CardDefinition>>;
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use lor_engine::cards::{CardCatalogue, CardDefinition, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::unit("U1", "Scout", 1, 1, 1));
///
/// let found = registry.definition("U1").unwrap();
/// assert_eq!(found.name, "Scout");
/// assert!(registry.definition("nope").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<String, Rc<CardDefinition>>,
    /// Codes in registration order.
    order: Vec<String>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same code.
    pub fn register(&mut self, card: CardDefinition) {
        let code = card.code.clone();
        if self.cards.insert(code.clone(), Rc::new(card)).is_none() {
            self.order.push(code);
        }
    }

    /// Builder variant of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, card: CardDefinition) -> Self {
        self.register(card);
        self
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.cards.contains_key(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<CardDefinition>> {
        self.order.iter().filter_map(|code| self.cards.get(code))
    }

    /// Codes of collectible cards, in registration order.
    pub fn collectible_codes(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|def| def.collectible)
            .map(|def| def.code.as_str())
    }
}

impl CardCatalogue for CardRegistry {
    fn definition(&self, code: &str) -> Option<Rc<CardDefinition>> {
        self.cards.get(code).cloned()
    }
}
