//! Game state.
//!
//! `GameState` owns everything a game consists of: the card arena, both
//! boards and players, the effect and grant registries, the transient
//! buffers of the action state machine, and the history stream.
//!
//! ## Buffers
//!
//! - play buffer: the field card being played, awaiting its camp slot
//! - spell buffer: spells placed this action cycle, not yet committed
//! - movement buffer: units moved to the battlefield, not yet declared
//! - targeting and choice buffers: requests for controller input
//! - action buffer: follow-up actions the engine queues for itself
//!
//! Game logic lives in `impl GameState` blocks spread over the `zones`,
//! `events`, `grants`, `rules` and `logic` modules.

use std::collections::VecDeque;
use std::rc::Rc;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::action::{Action, HistoryRecord};
use super::config::Config;
use super::entity::EntityId;
use super::error::EngineError;
use super::player::{Player, Team, TeamMap};
use super::rng::GameRng;
use crate::cards::{Card, CardCatalogue, UnitState};
use crate::events::{EffectRegistry, Event};
use crate::grants::GrantRegistry;
use crate::rules::{Phase, Status};
use crate::stack::{ChoiceBuffer, SpellStack, TargetingBuffer};
use crate::zones::{Board, Zone};

/// The field card being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayBuffer {
    pub card: EntityId,
    pub team: Team,
    /// Hand index the card came from, for cancellation.
    pub hand_index: usize,
    /// Camp index the card will be summoned at.
    pub camp_index: usize,
    /// Whether the occupant at `camp_index` is obliterated first.
    pub replace: bool,
}

/// A unit moved onto the battlefield but not yet declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub unit: EntityId,
    /// Team whose camp the unit came from.
    pub team: Team,
    /// Camp index before the move.
    pub from_camp: usize,
}

/// An ongoing combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    pub attacker: Team,
    /// Blockers were declared.
    pub blocked: bool,
    /// Every attacker had Scout.
    pub scouting: bool,
}

/// Complete game state.
#[derive(Clone)]
pub struct GameState {
    // === Setup ===
    pub config: Config,
    pub catalogue: Rc<dyn CardCatalogue>,
    pub rng: GameRng,

    // === Entities ===
    pub cards: FxHashMap<EntityId, Card>,
    pub boards: TeamMap<Board>,
    pub players: TeamMap<Player>,
    pub effects: EffectRegistry,
    pub grants: GrantRegistry,

    // === Buffers ===
    pub spell_stack: SpellStack,
    pub targeting: TargetingBuffer,
    pub choices: ChoiceBuffer,
    pub play_buffer: Option<PlayBuffer>,
    pub spell_buffer: Vec<EntityId>,
    pub movement: Vec<Movement>,
    pub action_buffer: VecDeque<Action>,
    /// Mana reserved by spells on the stack, spent when they are cast.
    pub reservations: FxHashMap<EntityId, i32>,

    // === Progression ===
    pub phase: Phase,
    /// Phase to restore once targeting or replacing is over.
    pub phase_before: Phase,
    /// Team allowed to act in idle and combat.
    pub initiative: Team,
    /// Team holding the attack token in odd rounds.
    pub starting_team: Team,
    pub round: u32,
    pub combat: Option<Combat>,
    pub mulligan_done: TeamMap<bool>,
    pub status: Status,

    // === History ===
    pub history: Vector<HistoryRecord>,

    next_entity: u32,
}

impl GameState {
    /// Create an empty game: no cards, mulligan phase, round zero.
    #[must_use]
    pub fn new(config: Config, catalogue: Rc<dyn CardCatalogue>, seed: u64) -> Self {
        let players = TeamMap::new(|team| Player::new(team, config.start_nexus_health));
        Self {
            config,
            catalogue,
            rng: GameRng::new(seed),
            cards: FxHashMap::default(),
            boards: TeamMap::with_default(),
            players,
            effects: EffectRegistry::new(),
            grants: GrantRegistry::new(),
            spell_stack: SpellStack::new(),
            targeting: TargetingBuffer::new(),
            choices: ChoiceBuffer::new(),
            play_buffer: None,
            spell_buffer: Vec::new(),
            movement: Vec::new(),
            action_buffer: VecDeque::new(),
            reservations: FxHashMap::default(),
            phase: Phase::Mulligan,
            phase_before: Phase::Idle,
            initiative: Team::Blue,
            starting_team: Team::Blue,
            round: 0,
            combat: None,
            mulligan_done: TeamMap::with_value(false),
            status: Status::Ongoing,
            history: Vector::new(),
            next_entity: EntityId::FIRST_CARD.raw(),
        }
    }

    // === Entities ===

    /// Allocate a fresh card id.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Card lookup that treats a missing id as an invariant violation.
    pub fn get_card(&self, id: EntityId) -> Result<&Card, EngineError> {
        self.cards.get(&id).ok_or(EngineError::UnknownEntity(id))
    }

    pub fn get_card_mut(&mut self, id: EntityId) -> Result<&mut Card, EngineError> {
        self.cards.get_mut(&id).ok_or(EngineError::UnknownEntity(id))
    }

    /// Unit stats of a card, failing for non-units.
    pub fn unit_mut(&mut self, id: EntityId) -> Result<&mut UnitState, EngineError> {
        self.get_card_mut(id)?
            .unit
            .as_mut()
            .ok_or(EngineError::NotAUnit(id))
    }

    /// Team an entity belongs to.
    #[must_use]
    pub fn team_of(&self, entity: EntityId) -> Option<Team> {
        entity
            .as_team()
            .or_else(|| self.card(entity).map(|c| c.owner))
    }

    /// Ids a team holds in a zone, in container order.
    #[must_use]
    pub fn cards_in(&self, team: Team, zone: Zone) -> Vec<EntityId> {
        let board = &self.boards[team];
        match zone {
            Zone::Battlefield => board.battlefield_units().collect(),
            Zone::Queue => board.queue.iter().copied().collect(),
            Zone::SpellStack => self
                .spell_stack
                .iter()
                .filter(|&id| self.card(id).is_some_and(|c| c.owner == team))
                .collect(),
            Zone::Pending => self
                .play_buffer
                .filter(|p| p.team == team)
                .map(|p| p.card)
                .into_iter()
                .collect(),
            Zone::Nowhere => Vec::new(),
            _ => board.container(zone).cloned().unwrap_or_default(),
        }
    }

    // === Progression ===

    /// Team that must answer the controller call right now.
    #[must_use]
    pub fn acting_team(&self) -> Team {
        match self.phase {
            Phase::Mulligan => Team::ALL
                .into_iter()
                .find(|&t| !self.mulligan_done[t])
                .unwrap_or(self.initiative),
            Phase::Targeting => self
                .choices
                .top()
                .map(|c| c.team)
                .or_else(|| self.targeting.top().map(|p| p.team))
                .unwrap_or(self.initiative),
            Phase::Replacing => self.play_buffer.map_or(self.initiative, |p| p.team),
            Phase::Idle | Phase::Combat => self.initiative,
        }
    }

    #[must_use]
    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }

    /// Team holding the attacker role, if combat is active.
    #[must_use]
    pub fn attacker(&self) -> Option<Team> {
        self.combat.map(|c| c.attacker)
    }

    /// Nothing placed, moved or being played.
    #[must_use]
    pub fn buffers_empty(&self) -> bool {
        self.play_buffer.is_none() && self.spell_buffer.is_empty() && self.movement.is_empty()
    }

    /// Mana the team has reserved for spells on the stack.
    #[must_use]
    pub fn reserved_mana(&self, team: Team) -> i32 {
        self.reservations
            .iter()
            .filter(|(id, _)| self.card(**id).is_some_and(|c| c.owner == team))
            .map(|(_, amount)| amount)
            .sum()
    }

    // === History ===

    pub fn record_action(&mut self, action: &Action) {
        self.history.push_back(HistoryRecord::Action {
            round: self.round,
            action: action.clone(),
        });
    }

    pub fn record_event(&mut self, event: &Event) {
        self.history.push_back(HistoryRecord::Event {
            round: self.round,
            event: event.clone(),
        });
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.history.iter().filter_map(|r| match r {
            HistoryRecord::Event { event, .. } => Some(event),
            HistoryRecord::Action { .. } => None,
        })
    }
}
