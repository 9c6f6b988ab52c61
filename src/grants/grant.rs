//! Grant data and registry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::Keyword;
use crate::core::EntityId;
use crate::effects::EffectTemplate;
use crate::events::EffectId;

/// Unique identifier for a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrantId(pub u32);

impl GrantId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for GrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grant({})", self.0)
    }
}

/// Type-specific payload of a grant.
#[derive(Clone, Debug)]
pub enum GrantKind {
    /// Add power and health.
    Stats { power: i32, health: i32 },
    /// Change the mana cost.
    Mana { delta: i32 },
    /// Add (`add = true`) or remove a keyword.
    Keyword { keyword: Keyword, add: bool },
    /// Attach an extra effect.
    Effect { template: EffectTemplate },
}

/// A reversible modifier attached to a card.
#[derive(Clone, Debug)]
pub struct Grant {
    pub id: GrantId,
    /// Card whose effect created the grant.
    pub bestowing: EntityId,
    /// Card carrying the grant.
    pub bestowed: EntityId,
    /// Permanent grants change base values and survive round end.
    pub permanent: bool,
    pub kind: GrantKind,
    /// For keyword grants: whether applying changed the keyword set.
    pub changed: bool,
    /// For effect grants: the attached effect.
    pub effect: Option<EffectId>,
    pub undone: bool,
}

impl Grant {
    #[must_use]
    pub fn new(bestowing: EntityId, bestowed: EntityId, kind: GrantKind, permanent: bool) -> Self {
        Self {
            id: GrantId(0),
            bestowing,
            bestowed,
            permanent,
            kind,
            changed: false,
            effect: None,
            undone: false,
        }
    }
}

/// Storage for every grant ever applied in a game.
#[derive(Clone, Debug, Default)]
pub struct GrantRegistry {
    grants: FxHashMap<GrantId, Grant>,
    next_id: u32,
}

impl GrantRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a grant, assigning its ID.
    pub fn insert(&mut self, mut grant: Grant) -> GrantId {
        let id = GrantId(self.next_id);
        self.next_id += 1;
        grant.id = id;
        self.grants.insert(id, grant);
        id
    }

    #[must_use]
    pub fn get(&self, id: GrantId) -> Option<&Grant> {
        self.grants.get(&id)
    }

    pub fn get_mut(&mut self, id: GrantId) -> Option<&mut Grant> {
        self.grants.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_ids() {
        let mut registry = GrantRegistry::new();
        let a = registry.insert(Grant::new(
            EntityId(2),
            EntityId(3),
            GrantKind::Mana { delta: -1 },
            false,
        ));
        let b = registry.insert(Grant::new(
            EntityId(2),
            EntityId(4),
            GrantKind::Stats { power: 1, health: 1 },
            true,
        ));

        assert_ne!(a, b);
        assert_eq!(registry.get(b).map(|g| g.bestowed), Some(EntityId(4)));
        assert_eq!(registry.len(), 2);
        assert_eq!(format!("{a}"), "Grant(0)");
    }
}
