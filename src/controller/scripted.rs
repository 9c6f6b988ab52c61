//! Controller replaying a fixed list of actions.

use std::collections::VecDeque;

use crate::controller::Controller;
use crate::core::{Action, EntityId, GameState, Team};
use crate::stack::PendingTargeting;

/// Hands out queued actions in order. Once the script runs dry it accepts,
/// skips targeting and keeps its opening hand.
#[derive(Clone, Debug, Default)]
pub struct ScriptedController {
    script: VecDeque<Action>,
}

impl ScriptedController {
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: actions.into_iter().collect(),
        }
    }

    /// Append an action to the script.
    pub fn push(&mut self, action: Action) {
        self.script.push_back(action);
    }

    /// Actions not handed out yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Controller for ScriptedController {
    fn choose_action(&mut self, _state: &GameState, team: Team) -> Action {
        self.script.pop_front().unwrap_or(Action::Accept { team })
    }

    fn choose_targets(&mut self, _state: &GameState, team: Team, _pending: &PendingTargeting) -> Action {
        self.script.pop_front().unwrap_or(Action::Cancel { team })
    }

    fn choose_mulligan(&mut self, _state: &GameState, team: Team, hand: &[EntityId]) -> Action {
        self.script.pop_front().unwrap_or_else(|| Action::Mulligan {
            team,
            replace: vec![false; hand.len()],
        })
    }
}
