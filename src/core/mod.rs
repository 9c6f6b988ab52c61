//! Core engine types: entities, teams, state, actions, RNG, configuration
//! and errors.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionLabel, HistoryRecord};
pub use config::Config;
pub use entity::EntityId;
pub use error::{EngineError, InvalidAction};
pub use player::{Mana, Nexus, Player, RoundFlags, Team, TeamMap};
pub use rng::GameRng;
pub use state::{Combat, GameState, Movement, PlayBuffer};
