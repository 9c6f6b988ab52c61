//! Stacks and LIFO buffers.
//!
//! - [`SpellStack`]: spells placed but not yet cast, shared by both teams
//!   and resolved last-in first-out.
//! - [`TargetingBuffer`]: effects waiting for manually chosen targets. The
//!   most recently queued request is answered first.
//! - [`ChoiceBuffer`]: pick-one-of offers raised by effects.
//!
//! ```
//! use lor_engine::core::EntityId;
//! use lor_engine::stack::SpellStack;
//!
//! let mut stack = SpellStack::new();
//! stack.push(EntityId(5));
//! stack.push(EntityId(6));
//! assert_eq!(stack.pop(), Some(EntityId(6)));
//! ```

mod pending;
mod spell;

pub use pending::{ChoiceBuffer, PendingChoice, PendingTargeting, TargetingBuffer};
pub use spell::SpellStack;
