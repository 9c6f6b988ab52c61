//! Action representation and history records.
//!
//! An `Action` is a closed sum type: every variant names the acting team and
//! carries its own payload. Phases accept actions by their `ActionLabel`,
//! and execution reports whether initiative passes to the opponent.
//!
//! Two variants (`PlayFieldCardFinish`, `PlaySpellFinish`) are follow-ups:
//! the engine queues them itself once a play has all its targets, and
//! controllers may not submit them.
//!
//! ```
//! use lor_engine::core::{Action, ActionLabel, Team};
//!
//! let pass = Action::Accept { team: Team::Blue };
//! assert_eq!(pass.label(), ActionLabel::Accept);
//! assert_eq!(pass.team(), Team::Blue);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::Team;
use crate::events::Event;

/// A complete game action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Confirm: declare attack or blocks, commit spells, resolve, or pass.
    Accept { team: Team },
    /// Undo whatever is in flight in the play, spell or movement buffers.
    Cancel { team: Team },
    /// Pick option `index` of the top pending choice.
    Choice { team: Team, index: usize },
    /// Pull an enemy camp unit in front of the challenger in `lane`.
    DragEnemy {
        team: Team,
        lane: usize,
        camp_index: usize,
    },
    /// One flag per hand card; flagged cards are replaced.
    Mulligan { team: Team, replace: Vec<bool> },
    /// Place a spell from hand onto the stack, or take a placed spell back.
    ///
    /// `index` is a hand index when `to_stack` is set, otherwise an index
    /// into the uncommitted spell buffer.
    PlaceSpell {
        team: Team,
        index: usize,
        to_stack: bool,
    },
    /// Move units between camp and battlefield.
    ///
    /// Moving forward, `indices` are camp indices. Attackers need no
    /// `lanes`; blockers give one lane per index. Moving back, `indices`
    /// are battlefield lanes holding uncommitted units.
    PlaceUnit {
        team: Team,
        indices: Vec<usize>,
        lanes: Vec<usize>,
        to_battlefield: bool,
    },
    /// Start playing a field card from hand.
    PlayRequest { team: Team, hand_index: usize },
    /// Follow-up: summon the field card held in the play buffer.
    PlayFieldCardFinish { team: Team },
    /// Follow-up: cast from the spell stack, only the top one if `burst`.
    PlaySpellFinish { team: Team, burst: bool },
    /// Targets for the top pending targeting request.
    Targeting {
        team: Team,
        targets: SmallVec<[EntityId; 4]>,
    },
    /// Camp slot to vacate for the field card in the play buffer.
    Replace { team: Team, camp_index: usize },
}

/// Fieldless discriminant of [`Action`], used for phase gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionLabel {
    Accept,
    Cancel,
    Choice,
    DragEnemy,
    Mulligan,
    PlaceSpell,
    PlaceUnit,
    PlayRequest,
    PlayFieldCardFinish,
    PlaySpellFinish,
    Targeting,
    Replace,
}

impl ActionLabel {
    /// Labels only the engine may issue.
    #[must_use]
    pub const fn is_follow_up(self) -> bool {
        matches!(self, Self::PlayFieldCardFinish | Self::PlaySpellFinish)
    }
}

impl Action {
    /// The team performing this action.
    #[must_use]
    pub fn team(&self) -> Team {
        match self {
            Self::Accept { team }
            | Self::Cancel { team }
            | Self::Choice { team, .. }
            | Self::DragEnemy { team, .. }
            | Self::Mulligan { team, .. }
            | Self::PlaceSpell { team, .. }
            | Self::PlaceUnit { team, .. }
            | Self::PlayRequest { team, .. }
            | Self::PlayFieldCardFinish { team }
            | Self::PlaySpellFinish { team, .. }
            | Self::Targeting { team, .. }
            | Self::Replace { team, .. } => *team,
        }
    }

    #[must_use]
    pub fn label(&self) -> ActionLabel {
        match self {
            Self::Accept { .. } => ActionLabel::Accept,
            Self::Cancel { .. } => ActionLabel::Cancel,
            Self::Choice { .. } => ActionLabel::Choice,
            Self::DragEnemy { .. } => ActionLabel::DragEnemy,
            Self::Mulligan { .. } => ActionLabel::Mulligan,
            Self::PlaceSpell { .. } => ActionLabel::PlaceSpell,
            Self::PlaceUnit { .. } => ActionLabel::PlaceUnit,
            Self::PlayRequest { .. } => ActionLabel::PlayRequest,
            Self::PlayFieldCardFinish { .. } => ActionLabel::PlayFieldCardFinish,
            Self::PlaySpellFinish { .. } => ActionLabel::PlaySpellFinish,
            Self::Targeting { .. } => ActionLabel::Targeting,
            Self::Replace { .. } => ActionLabel::Replace,
        }
    }

    /// Attack declaration with the given camp indices.
    #[must_use]
    pub fn attack(team: Team, indices: &[usize]) -> Self {
        Self::PlaceUnit {
            team,
            indices: indices.to_vec(),
            lanes: Vec::new(),
            to_battlefield: true,
        }
    }

    /// Block declaration: `(camp_index, lane)` pairs.
    #[must_use]
    pub fn block(team: Team, pairs: &[(usize, usize)]) -> Self {
        Self::PlaceUnit {
            team,
            indices: pairs.iter().map(|&(i, _)| i).collect(),
            lanes: pairs.iter().map(|&(_, l)| l).collect(),
            to_battlefield: true,
        }
    }

    /// Targeting action from a slice of entities.
    #[must_use]
    pub fn targets(team: Team, targets: &[EntityId]) -> Self {
        Self::Targeting {
            team,
            targets: SmallVec::from_slice(targets),
        }
    }
}

/// One entry of the replay stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRecord {
    /// An executed action.
    Action { round: u32, action: Action },
    /// A fired event.
    Event { round: u32, event: Event },
}

impl HistoryRecord {
    #[must_use]
    pub fn round(&self) -> u32 {
        match self {
            Self::Action { round, .. } | Self::Event { round, .. } => *round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let action = Action::PlayRequest {
            team: Team::Red,
            hand_index: 2,
        };
        assert_eq!(action.label(), ActionLabel::PlayRequest);
        assert_eq!(action.team(), Team::Red);
        assert!(!action.label().is_follow_up());
        assert!(ActionLabel::PlaySpellFinish.is_follow_up());
    }

    #[test]
    fn test_block_helper() {
        let action = Action::block(Team::Blue, &[(0, 2), (1, 0)]);
        match action {
            Action::PlaceUnit { indices, lanes, .. } => {
                assert_eq!(indices, vec![0, 1]);
                assert_eq!(lanes, vec![2, 0]);
            }
            _ => panic!("expected PlaceUnit"),
        }
    }

    #[test]
    fn test_serialization() {
        let action = Action::targets(Team::Blue, &[EntityId(4), EntityId(1)]);
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
