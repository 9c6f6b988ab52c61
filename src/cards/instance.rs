//! Card instances - runtime card state.
//!
//! `Card` is a specific copy of a definition in one game. It tracks where
//! the card is, who owns it, cost changes, current keywords, the effects and
//! grants attached to it, and for units the combat stats in [`UnitState`].
//!
//! Effective values are always clamped at zero:
//! cost = max(0, base + permanent delta + temporary delta),
//! power = max(0, base + delta),
//! health = max(0, base + delta - damage).

use std::fmt;
use std::rc::Rc;

use super::definition::{CardDefinition, CardKind};
use super::keywords::{Keyword, KeywordSet};
use crate::core::{EntityId, Team};
use crate::events::EffectId;
use crate::grants::GrantId;
use crate::zones::Zone;

/// Replaces the incoming damage amount after Tough is applied.
pub type DamageFn = Rc<dyn Fn(i32) -> i32>;

/// Decides whether a unit dies; the default is "health reached zero".
pub type KillFn = Rc<dyn Fn(&UnitState) -> bool>;

/// Mutable combat stats of a unit.
#[derive(Clone)]
pub struct UnitState {
    /// Base power including permanent grants.
    pub power_base: i32,
    /// Temporary power changes, cleared at round end.
    pub power_delta: i32,
    pub health_base: i32,
    pub health_delta: i32,
    /// Accumulated damage.
    pub damage: i32,
    pub alive: bool,
    pub damage_fn: Option<DamageFn>,
    pub kill_fn: Option<KillFn>,
}

impl UnitState {
    #[must_use]
    pub fn new(power: i32, health: i32) -> Self {
        Self {
            power_base: power,
            power_delta: 0,
            health_base: health,
            health_delta: 0,
            damage: 0,
            alive: true,
            damage_fn: None,
            kill_fn: None,
        }
    }

    #[must_use]
    pub fn power(&self) -> i32 {
        (self.power_base + self.power_delta).max(0)
    }

    /// Health before damage.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        (self.health_base + self.health_delta).max(0)
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        (self.health_base + self.health_delta - self.damage).max(0)
    }

    /// Whether the unit should die now.
    #[must_use]
    pub fn is_lethal(&self) -> bool {
        match &self.kill_fn {
            Some(kill) => kill(self),
            None => self.health() <= 0,
        }
    }
}

impl fmt::Debug for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitState")
            .field("power", &self.power())
            .field("health", &self.health())
            .field("damage", &self.damage)
            .field("alive", &self.alive)
            .field("custom_damage", &self.damage_fn.is_some())
            .field("custom_kill", &self.kill_fn.is_some())
            .finish()
    }
}

/// A card instance in a game.
#[derive(Clone, Debug)]
pub struct Card {
    pub id: EntityId,
    pub definition: Rc<CardDefinition>,
    pub owner: Team,
    /// Card whose effect created this one, if any.
    pub creator: Option<EntityId>,
    pub zone: Zone,
    /// Index within the zone container (lane for battlefield).
    pub position: usize,
    pub hidden: bool,
    /// Temporary cost change.
    pub mana_delta: i32,
    /// Permanent cost change.
    pub mana_base_delta: i32,
    pub keywords: KeywordSet,
    /// Effects owned by this card, in registration order.
    pub effects: Vec<EffectId>,
    pub grants: Vec<GrantId>,
    pub temp_grants: Vec<GrantId>,
    /// Present for units only.
    pub unit: Option<UnitState>,
}

impl Card {
    /// Create a fresh instance outside every zone.
    #[must_use]
    pub fn new(id: EntityId, definition: Rc<CardDefinition>, owner: Team) -> Self {
        let unit = match definition.kind {
            CardKind::Unit { power, health } => Some(UnitState::new(power, health)),
            _ => None,
        };
        Self {
            id,
            keywords: definition.keywords,
            definition,
            owner,
            creator: None,
            zone: Zone::Nowhere,
            position: 0,
            hidden: true,
            mana_delta: 0,
            mana_base_delta: 0,
            effects: Vec::new(),
            grants: Vec::new(),
            temp_grants: Vec::new(),
            unit,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.definition.code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn cost(&self) -> i32 {
        (self.definition.cost + self.mana_base_delta + self.mana_delta).max(0)
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.unit.is_some()
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.definition.is_spell()
    }

    #[must_use]
    pub fn is_field_card(&self) -> bool {
        self.definition.is_field_card()
    }

    /// Current power, zero for non-units.
    #[must_use]
    pub fn power(&self) -> i32 {
        self.unit.as_ref().map_or(0, UnitState::power)
    }

    /// Current health, zero for non-units.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.unit.as_ref().map_or(0, UnitState::health)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.unit.as_ref().is_some_and(|u| u.alive)
    }
}
