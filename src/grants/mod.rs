//! Grant system: reversible modifiers attached to cards.
//!
//! A grant changes stats, mana cost, a keyword or the attached effects of
//! one card. Temporary grants modify the per-round deltas and are undone at
//! round end; permanent grants modify base values and are only undone when
//! a card is recalled or obliterated. Every grant can be undone exactly once.

pub mod apply;
pub mod grant;

pub use grant::{Grant, GrantId, GrantKind, GrantRegistry};
