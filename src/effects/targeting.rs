//! Effect targeting system.
//!
//! Defines how effects select their targets:
//! - `TargetSpec`: What can be targeted, how many, and who picks
//! - `TargetFilter`: Filters for valid targets
//! - `TargetSelector`: Candidate enumeration and validation for one team

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Keyword;
use crate::core::{EntityId, GameRng, GameState, Team};
use crate::zones::Zone;

/// How an effect picks its targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// What kind of entities can be targeted.
    pub target_type: TargetType,
    /// Filters to apply to potential targets.
    pub filters: Vec<TargetFilter>,
    /// How many targets to select.
    pub count: TargetCount,
    /// Whether choosing no target at all is allowed.
    pub optional: bool,
    /// Who picks the targets.
    pub mode: TargetMode,
}

/// The type of entity that can be targeted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    Nexus,
    /// Living units in the listed zones.
    Unit { zones: Vec<Zone> },
    /// Any card in the listed zones.
    Card { zones: Vec<Zone> },
    UnitOrNexus { zones: Vec<Zone> },
}

/// Number of targets to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCount {
    /// Exactly N targets, or every candidate if fewer exist.
    Exactly(usize),
    /// Up to N targets.
    UpTo(usize),
    /// All valid targets.
    All,
}

/// Who selects targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// The owning team's controller chooses.
    Manual,
    /// The first candidates in board order.
    First,
    /// Random candidates drawn from the game RNG.
    Random,
    /// Every candidate.
    All,
}

/// Filters for valid targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFilter {
    /// Target must belong to the acting team.
    Ally,
    /// Target must belong to the opposing team.
    Enemy,
    /// Target must not be the source entity.
    NotSource,
    HasKeyword(Keyword),
    LacksKeyword(Keyword),
    PowerAtMost(i32),
    PowerAtLeast(i32),
    /// Target has taken damage.
    Damaged,
}

impl TargetSpec {
    fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            filters: Vec::new(),
            count: TargetCount::Exactly(1),
            optional: false,
            mode: TargetMode::Manual,
        }
    }

    /// A single unit in camp or on the battlefield.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(TargetType::Unit {
            zones: vec![Zone::Camp, Zone::Battlefield],
        })
    }

    /// Several units in camp or on the battlefield.
    #[must_use]
    pub fn units(count: TargetCount) -> Self {
        Self::unit().with_count(count)
    }

    #[must_use]
    pub fn nexus() -> Self {
        Self::new(TargetType::Nexus)
    }

    /// A single unit or nexus.
    #[must_use]
    pub fn unit_or_nexus() -> Self {
        Self::new(TargetType::UnitOrNexus {
            zones: vec![Zone::Camp, Zone::Battlefield],
        })
    }

    /// A single card in hand.
    #[must_use]
    pub fn card_in_hand() -> Self {
        Self::new(TargetType::Card {
            zones: vec![Zone::Hand],
        })
    }

    /// Add a filter (builder pattern).
    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: TargetCount) -> Self {
        self.count = count;
        self
    }

    /// Make targeting optional (builder pattern).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Let the engine pick targets (builder pattern).
    #[must_use]
    pub fn automatic(mut self, mode: TargetMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.mode == TargetMode::Manual
    }

    /// Largest number of targets that may be picked from `available`.
    #[must_use]
    pub fn max_count(&self, available: usize) -> usize {
        match self.count {
            TargetCount::Exactly(n) | TargetCount::UpTo(n) => n.min(available),
            TargetCount::All => available,
        }
    }

    /// Smallest acceptable number of targets given `available` candidates.
    #[must_use]
    pub fn min_count(&self, available: usize) -> usize {
        if self.optional {
            return 0;
        }
        match self.count {
            TargetCount::Exactly(n) => n.min(available),
            TargetCount::UpTo(_) => 0,
            TargetCount::All => available,
        }
    }
}

/// Selector for choosing targets based on a spec.
#[derive(Clone, Debug)]
pub struct TargetSelector<'a> {
    spec: &'a TargetSpec,
    acting_team: Team,
    source: Option<EntityId>,
}

impl<'a> TargetSelector<'a> {
    /// Create a new target selector.
    #[must_use]
    pub fn new(spec: &'a TargetSpec, acting_team: Team) -> Self {
        Self {
            spec,
            acting_team,
            source: None,
        }
    }

    /// Set the source entity (for NotSource filter).
    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// All valid targets in board order: acting team first, nexus before
    /// cards, then each listed zone left to right.
    #[must_use]
    pub fn valid_targets(&self, state: &GameState) -> Vec<EntityId> {
        let mut targets = Vec::new();

        for team in [self.acting_team, self.acting_team.opponent()] {
            let (nexus, zones, units_only): (bool, &[Zone], bool) = match &self.spec.target_type {
                TargetType::Nexus => (true, &[][..], false),
                TargetType::Unit { zones } => (false, zones.as_slice(), true),
                TargetType::Card { zones } => (false, zones.as_slice(), false),
                TargetType::UnitOrNexus { zones } => (true, zones.as_slice(), true),
            };

            if nexus {
                let entity = EntityId::nexus(team);
                if self.passes_filters(state, entity) {
                    targets.push(entity);
                }
            }
            for &zone in zones {
                for entity in state.cards_in(team, zone) {
                    let is_candidate = state.card(entity).is_some_and(|card| {
                        !units_only || card.is_alive()
                    });
                    if is_candidate && self.passes_filters(state, entity) {
                        targets.push(entity);
                    }
                }
            }
        }

        targets
    }

    /// Check a manual selection against the spec.
    pub fn validate(&self, state: &GameState, chosen: &[EntityId]) -> Result<(), String> {
        let candidates = self.valid_targets(state);

        for (i, target) in chosen.iter().enumerate() {
            if chosen[..i].contains(target) {
                return Err(format!("{target} chosen twice"));
            }
            if !candidates.contains(target) {
                return Err(format!("{target} is not a valid target"));
            }
        }

        let min = self.spec.min_count(candidates.len());
        let max = self.spec.max_count(candidates.len());
        if chosen.len() < min || chosen.len() > max {
            return Err(format!(
                "expected between {min} and {max} targets, got {}",
                chosen.len()
            ));
        }
        Ok(())
    }

    /// Pick targets without a controller.
    pub fn pick(&self, candidates: &[EntityId], rng: &mut GameRng) -> SmallVec<[EntityId; 4]> {
        let count = self.spec.max_count(candidates.len());
        match self.spec.mode {
            TargetMode::All => candidates.iter().copied().collect(),
            TargetMode::Random => rng.sample(candidates, count).into_iter().collect(),
            TargetMode::First | TargetMode::Manual => {
                candidates.iter().take(count).copied().collect()
            }
        }
    }

    /// Check if an entity passes all filters.
    fn passes_filters(&self, state: &GameState, entity: EntityId) -> bool {
        self.spec
            .filters
            .iter()
            .all(|filter| self.passes_filter(state, entity, filter))
    }

    /// Check if an entity passes a single filter.
    fn passes_filter(&self, state: &GameState, entity: EntityId, filter: &TargetFilter) -> bool {
        if let Some(team) = entity.as_team() {
            let nexus = &state.players[team].nexus;
            return match filter {
                TargetFilter::Ally => team == self.acting_team,
                TargetFilter::Enemy => team != self.acting_team,
                TargetFilter::NotSource => self.source != Some(entity),
                TargetFilter::HasKeyword(k) => nexus.keywords.contains(*k),
                TargetFilter::LacksKeyword(k) => !nexus.keywords.contains(*k),
                TargetFilter::PowerAtMost(_) | TargetFilter::PowerAtLeast(_) => false,
                TargetFilter::Damaged => nexus.health < state.config.start_nexus_health,
            };
        }

        let Some(card) = state.card(entity) else {
            return false;
        };
        match filter {
            TargetFilter::Ally => card.owner == self.acting_team,
            TargetFilter::Enemy => card.owner != self.acting_team,
            TargetFilter::NotSource => self.source != Some(entity),
            TargetFilter::HasKeyword(k) => card.has(*k),
            TargetFilter::LacksKeyword(k) => !card.has(*k),
            TargetFilter::PowerAtMost(p) => card.is_unit() && card.power() <= *p,
            TargetFilter::PowerAtLeast(p) => card.is_unit() && card.power() >= *p,
            TargetFilter::Damaged => card.unit.as_ref().is_some_and(|u| u.damage > 0),
        }
    }
}
