//! Rules of the action state machine.
//!
//! Each [`Phase`] accepts a fixed set of action labels. An action is first
//! checked by [`GameState::validate`], which never mutates anything, and
//! only then executed. Execution reports whether initiative passes to the
//! opponent.
//!
//! - `phase`: phases and the labels they accept
//! - `validate`: payload checks per action
//! - `execute`: the transition for each action
//! - `status`: game outcome
//!
//! [`GameState::validate`]: crate::core::GameState::validate

pub mod execute;
pub mod phase;
pub mod status;
pub mod validate;

pub use phase::Phase;
pub use status::{Status, WinReason};
