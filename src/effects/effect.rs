//! Effects: callbacks subscribed to game events.
//!
//! A card definition carries [`EffectTemplate`]s. When a card instance is
//! created, each template becomes an [`Effect`] in the registry, owned by
//! that card and subscribed at the template's [`RegistrationTime`].
//!
//! Callbacks receive the game state mutably and may call back into any
//! game logic (damage, grants, summons), which fires further events
//! depth-first before the outer delivery continues.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::targeting::TargetSpec;
use crate::core::{EngineError, EntityId, GameState, Team};
use crate::events::{EffectId, Event, EventKind};

/// Effect callback.
pub type EffectFn = Rc<dyn Fn(&mut GameState, &Event, &EffectContext) -> Result<(), EngineError>>;

/// When an effect is connected to its event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationTime {
    /// Whenever the card enters a live zone after being created or drawn.
    Creation,
    /// When the card enters its owner's hand.
    Draw,
    /// When the card is summoned to camp.
    Summon,
    /// When the card dies; disconnected again after DIE fires.
    Death,
}

/// What a callback knows about the effect that is firing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub effect: EffectId,
    /// Card (or nexus) owning the effect.
    pub owner: EntityId,
    /// Team of the owner.
    pub team: Team,
    /// Chosen or automatically selected targets.
    pub targets: SmallVec<[EntityId; 4]>,
}

/// Static description of an effect, carried by card definitions and
/// effect grants.
#[derive(Clone)]
pub struct EffectTemplate {
    pub kind: EventKind,
    pub registration: RegistrationTime,
    pub targeter: Option<TargetSpec>,
    /// Fires at most once.
    pub consumable: bool,
    /// Only fires for events concerning the owner itself.
    pub self_only: bool,
    pub callback: EffectFn,
}

impl EffectTemplate {
    /// An effect on `kind`, connected while the card is on the field.
    pub fn new<F>(kind: EventKind, callback: F) -> Self
    where
        F: Fn(&mut GameState, &Event, &EffectContext) -> Result<(), EngineError> + 'static,
    {
        Self {
            kind,
            registration: RegistrationTime::Summon,
            targeter: None,
            consumable: false,
            self_only: false,
            callback: Rc::new(callback),
        }
    }

    /// Fires when this card is played.
    pub fn on_play<F>(callback: F) -> Self
    where
        F: Fn(&mut GameState, &Event, &EffectContext) -> Result<(), EngineError> + 'static,
    {
        Self::new(EventKind::Play, callback)
            .with_registration(RegistrationTime::Draw)
            .self_only()
    }

    /// Fires when this spell is cast.
    pub fn on_cast<F>(callback: F) -> Self
    where
        F: Fn(&mut GameState, &Event, &EffectContext) -> Result<(), EngineError> + 'static,
    {
        Self::new(EventKind::Cast, callback)
            .with_registration(RegistrationTime::Draw)
            .self_only()
    }

    /// Fires when this card dies.
    pub fn last_breath<F>(callback: F) -> Self
    where
        F: Fn(&mut GameState, &Event, &EffectContext) -> Result<(), EngineError> + 'static,
    {
        Self::new(EventKind::Die, callback)
            .with_registration(RegistrationTime::Death)
            .self_only()
    }

    #[must_use]
    pub fn with_registration(mut self, registration: RegistrationTime) -> Self {
        self.registration = registration;
        self
    }

    #[must_use]
    pub fn with_targeter(mut self, spec: TargetSpec) -> Self {
        self.targeter = Some(spec);
        self
    }

    #[must_use]
    pub fn consumable(mut self) -> Self {
        self.consumable = true;
        self
    }

    #[must_use]
    pub fn self_only(mut self) -> Self {
        self.self_only = true;
        self
    }
}

impl fmt::Debug for EffectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectTemplate")
            .field("kind", &self.kind)
            .field("registration", &self.registration)
            .field("targeter", &self.targeter)
            .field("consumable", &self.consumable)
            .field("self_only", &self.self_only)
            .finish_non_exhaustive()
    }
}

/// An instantiated effect owned by a card or nexus.
#[derive(Clone)]
pub struct Effect {
    pub id: EffectId,
    pub owner: EntityId,
    pub kind: EventKind,
    pub registration: RegistrationTime,
    pub targeter: Option<TargetSpec>,
    pub targets: SmallVec<[EntityId; 4]>,
    pub consumable: bool,
    /// Fired once already; never subscribes again.
    pub consumed: bool,
    pub self_only: bool,
    pub subscribed: bool,
    pub callback: EffectFn,
}

impl Effect {
    /// Instantiate a template for `owner`. The id is assigned on insertion.
    #[must_use]
    pub fn from_template(template: &EffectTemplate, owner: EntityId) -> Self {
        Self {
            id: EffectId(0),
            owner,
            kind: template.kind,
            registration: template.registration,
            targeter: template.targeter.clone(),
            targets: SmallVec::new(),
            consumable: template.consumable,
            consumed: false,
            self_only: template.self_only,
            subscribed: false,
            callback: Rc::clone(&template.callback),
        }
    }

    /// Whether this effect needs a controller to pick targets.
    #[must_use]
    pub fn needs_manual_targets(&self) -> bool {
        self.targeter.as_ref().is_some_and(TargetSpec::is_manual)
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("registration", &self.registration)
            .field("targets", &self.targets)
            .field("consumed", &self.consumed)
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_builders() {
        let template = EffectTemplate::on_play(|_, _, _| Ok(()))
            .with_targeter(TargetSpec::unit())
            .consumable();

        assert_eq!(template.kind, EventKind::Play);
        assert_eq!(template.registration, RegistrationTime::Draw);
        assert!(template.self_only);
        assert!(template.consumable);
    }

    #[test]
    fn test_last_breath() {
        let template = EffectTemplate::last_breath(|_, _, _| Ok(()));
        assert_eq!(template.kind, EventKind::Die);
        assert_eq!(template.registration, RegistrationTime::Death);
    }

    #[test]
    fn test_from_template_shares_callback() {
        let template = EffectTemplate::new(EventKind::Strike, |_, _, _| Ok(()));
        let effect = Effect::from_template(&template, EntityId(9));

        assert_eq!(effect.owner, EntityId(9));
        assert!(!effect.subscribed);
        assert!(Rc::ptr_eq(&effect.callback, &template.callback));
        assert!(!effect.needs_manual_targets());
    }
}
