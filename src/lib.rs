//! # lor-engine
//!
//! A turn-based rules engine for a two-team collectible card game in the
//! style of Legends of Runeterra: units in camps and battlefield lanes, a
//! shared spell stack, attack tokens alternating by round, and card
//! abilities expressed as effects subscribed to game events.
//!
//! ## Design
//!
//! 1. **One state, many impl blocks**: [`GameState`] owns every card, board
//!    and buffer. Behavior lives in `impl GameState` blocks spread over the
//!    modules below, so effects receive `&mut GameState` and can do
//!    anything a rule can.
//!
//! 2. **Validate, then execute**: controller actions are checked without
//!    mutation first. Rejections are [`InvalidAction`]s; broken invariants
//!    during execution are [`EngineError`]s and abort the step.
//!
//! 3. **Reversible modifications**: every buff, keyword or effect a card
//!    gains is a grant that can be undone exactly.
//!
//! 4. **Deterministic**: all randomness flows from one seeded [`GameRng`].
//!
//! ## Modules
//!
//! - `core`: ids, teams, mana, config, actions, errors, RNG and the state
//! - `cards`: definitions, instances, keywords and the catalogue
//! - `zones`: boards, zones and card movement
//! - `events`: events, the effect registry, subscription and dispatch
//! - `effects`: effect templates, callbacks and targeting
//! - `grants`: reversible stat, mana, keyword and effect grants
//! - `stack`: spell stack, targeting and choice buffers
//! - `rules`: phases, validation, execution and status
//! - `logic`: rounds, mana, damage, combat and playing cards
//! - `controller`: decision makers and legal action enumeration
//! - `game`: the step loop and deck lists

pub mod cards;
pub mod controller;
pub mod core;
pub mod effects;
pub mod events;
pub mod game;
pub mod grants;
pub mod logic;
pub mod rules;
pub mod stack;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionLabel, Config, EngineError, EntityId, GameRng, GameState, HistoryRecord,
    InvalidAction, Team, TeamMap,
};

pub use crate::cards::{Card, CardCatalogue, CardDefinition, CardRegistry, Keyword, KeywordSet};

pub use crate::zones::{Board, Zone, ZonePosition};

pub use crate::events::{EffectId, Event, EventKind};

pub use crate::effects::{
    EffectContext, EffectTemplate, TargetCount, TargetFilter, TargetMode, TargetSelector, TargetSpec,
};

pub use crate::grants::{GrantId, GrantKind};

pub use crate::rules::{Phase, Status, WinReason};

pub use crate::controller::{legal_actions, Controller, RandomController, ScriptedController};

pub use crate::game::{DeckError, DeckList, Game};
