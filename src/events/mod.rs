//! Event bus.
//!
//! Cards subscribe effects to a fixed catalogue of event kinds. Firing an
//! event delivers it synchronously to every subscriber captured when the
//! call started; effects that fire further events resolve those
//! depth-first before the outer delivery continues.
//!
//! ## Key Types
//!
//! - `EventKind`: Index into the subscriber lists
//! - `Event`: Payload of a fired event
//! - `EffectRegistry`: Effect storage and per-kind subscriber lists
//!
//! ## Delivery order
//!
//! 1. On PLAY, effects owned by the played card itself.
//! 2. Everything else by the board position of the owner (nexus first,
//!    then camp and battlefield index, then other zones), ties broken by
//!    subscription order.

pub mod dispatch;
pub mod event;
pub mod registry;
pub mod subscription;

pub use event::{Event, EventKind};
pub use registry::{EffectId, EffectRegistry};
