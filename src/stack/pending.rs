//! Buffers of requests waiting for controller input.

use crate::core::{EntityId, Team};
use crate::effects::TargetSpec;
use crate::events::EffectId;

/// An effect waiting for manually chosen targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTargeting {
    pub effect: EffectId,
    /// Card being played that owns the effect.
    pub card: EntityId,
    /// Team that must choose.
    pub team: Team,
    pub spec: TargetSpec,
}

/// LIFO queue of targeting requests.
#[derive(Clone, Debug, Default)]
pub struct TargetingBuffer {
    entries: Vec<PendingTargeting>,
}

impl TargetingBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending: PendingTargeting) {
        self.entries.push(pending);
    }

    pub fn pop(&mut self) -> Option<PendingTargeting> {
        self.entries.pop()
    }

    /// Request answered next.
    #[must_use]
    pub fn top(&self) -> Option<&PendingTargeting> {
        self.entries.last()
    }

    /// Drop every request raised by `card`.
    pub fn remove_card(&mut self, card: EntityId) {
        self.entries.retain(|p| p.card != card);
    }

    #[must_use]
    pub fn has_card(&self, card: EntityId) -> bool {
        self.entries.iter().any(|p| p.card == card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Offer to create one of several cards in the chooser's hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingChoice {
    pub team: Team,
    /// Card whose effect made the offer.
    pub source: EntityId,
    /// Card codes on offer.
    pub options: Vec<String>,
}

/// LIFO queue of choices.
#[derive(Clone, Debug, Default)]
pub struct ChoiceBuffer {
    entries: Vec<PendingChoice>,
}

impl ChoiceBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, choice: PendingChoice) {
        self.entries.push(choice);
    }

    pub fn pop(&mut self) -> Option<PendingChoice> {
        self.entries.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&PendingChoice> {
        self.entries.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
