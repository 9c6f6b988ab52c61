//! Effect registry.
//!
//! The registry owns every instantiated effect and keeps, per event kind,
//! the list of subscribed effect ids in subscription order. Subscribing is
//! idempotent and consumed effects can never subscribe again.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::effects::Effect;

use super::event::EventKind;

/// Unique identifier for an effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

impl EffectId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Registry for effects and their subscriptions.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    /// All instantiated effects.
    effects: FxHashMap<EffectId, Effect>,

    /// Subscribed effects by event kind, in subscription order.
    by_kind: FxHashMap<EventKind, Vec<EffectId>>,

    /// Next effect ID to allocate.
    next_id: u32,
}

impl EffectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an effect without subscribing it, returning its ID.
    pub fn insert(&mut self, mut effect: Effect) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        effect.id = id;
        effect.subscribed = false;
        self.effects.insert(id, effect);
        id
    }

    /// Connect an effect to its event's subscriber list.
    ///
    /// Returns `false` if the effect is unknown, consumed or already subscribed.
    pub fn subscribe(&mut self, id: EffectId) -> bool {
        let Some(effect) = self.effects.get_mut(&id) else {
            return false;
        };
        if effect.subscribed || effect.consumed {
            return false;
        }
        effect.subscribed = true;
        self.by_kind.entry(effect.kind).or_default().push(id);
        true
    }

    /// Disconnect an effect. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: EffectId) -> bool {
        let Some(effect) = self.effects.get_mut(&id) else {
            return false;
        };
        if !effect.subscribed {
            return false;
        }
        effect.subscribed = false;
        let kind = effect.kind;
        if let Some(list) = self.by_kind.get_mut(&kind) {
            list.retain(|&e| e != id);
            if list.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
        true
    }

    /// Unsubscribe and mark as spent.
    pub fn consume(&mut self, id: EffectId) {
        self.unsubscribe(id);
        if let Some(effect) = self.effects.get_mut(&id) {
            effect.consumed = true;
        }
    }

    /// Unsubscribe and drop an effect entirely.
    pub fn remove(&mut self, id: EffectId) -> Option<Effect> {
        self.unsubscribe(id);
        self.effects.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        self.effects.get_mut(&id)
    }

    #[must_use]
    pub fn is_subscribed(&self, id: EffectId) -> bool {
        self.effects.get(&id).is_some_and(|e| e.subscribed)
    }

    /// Snapshot of the subscribers for a kind, in subscription order.
    #[must_use]
    pub fn subscribers(&self, kind: EventKind) -> Vec<EffectId> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }

    /// Subscribed effects owned by an entity.
    #[must_use]
    pub fn subscribed_for(&self, owner: EntityId) -> Vec<EffectId> {
        let mut ids: Vec<_> = self
            .effects
            .values()
            .filter(|e| e.owner == owner && e.subscribed)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Get total effect count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
