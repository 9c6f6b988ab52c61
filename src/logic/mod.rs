//! Game logic.
//!
//! Everything here is an `impl GameState` block. Controllers never call
//! these directly; actions and effect callbacks do. Every operation fires
//! its events synchronously and propagates invariant violations.
//!
//! - `cards`: create, clone, draw, obliterate, recall
//! - `mana`: availability, reservation and spending
//! - `damage`: unit and nexus damage, healing, death, game end
//! - `play`: summoning, casting, targeting requests, daybreak/nightfall
//! - `combat`: attack and block declaration, lane resolution, retreat
//! - `round`: round start and end
//! - `setup`: deck creation, opening hands and mulligan

pub mod cards;
pub mod combat;
pub mod damage;
pub mod mana;
pub mod play;
pub mod round;
pub mod setup;
