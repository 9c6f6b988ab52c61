//! Effect system for card abilities.
//!
//! ## Key Types
//!
//! - `EffectTemplate`: Effect description carried by card definitions
//! - `Effect`: Instantiated effect owned by a card, stored in the registry
//! - `EffectContext`: Owner, team and targets handed to a firing callback
//! - `RegistrationTime`: When an effect connects to its event
//! - `TargetSpec`/`TargetSelector`: Target enumeration and validation

pub mod effect;
pub mod targeting;

pub use effect::{Effect, EffectContext, EffectFn, EffectTemplate, RegistrationTime};
pub use targeting::{TargetCount, TargetFilter, TargetMode, TargetSelector, TargetSpec, TargetType};
