//! Card system: definitions, instances, keywords and the catalogue.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Static card data shared by every copy
//! - `CardKind`: Unit, spell, landmark or trap payload
//! - `Card`: Runtime card state (zone, owner, grants, effects)
//! - `UnitState`: Power, health, damage and pluggable lethality
//! - `KeywordSet`: Bitset over `Keyword`
//! - `CardCatalogue`: Code to definition lookup, implemented by `CardRegistry`

pub mod definition;
pub mod instance;
pub mod keywords;
pub mod registry;

pub use definition::{CardDefinition, CardKind, Rarity, SuperType};
pub use instance::{Card, DamageFn, KillFn, UnitState};
pub use keywords::{Keyword, KeywordSet};
pub use registry::{CardCatalogue, CardRegistry};
