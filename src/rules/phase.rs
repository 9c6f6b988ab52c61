//! Action phases and the labels each one accepts.

use serde::{Deserialize, Serialize};

use crate::core::ActionLabel;

/// State of the action state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start-of-game hand replacement.
    #[default]
    Mulligan,
    /// The team with initiative may play, attack or pass.
    Idle,
    /// An attack is declared and awaits blocks and responses.
    Combat,
    /// Effects await manually chosen targets or a choice.
    Targeting,
    /// The camp is full and a slot must be freed for a field card.
    Replacing,
}

impl Phase {
    /// Labels syntactically acceptable in this phase.
    #[must_use]
    pub fn accepted(self) -> &'static [ActionLabel] {
        use ActionLabel as L;
        match self {
            Phase::Mulligan => &[L::Mulligan],
            Phase::Idle => &[
                L::Accept,
                L::Cancel,
                L::DragEnemy,
                L::PlaceSpell,
                L::PlaceUnit,
                L::PlayRequest,
                L::PlayFieldCardFinish,
                L::PlaySpellFinish,
            ],
            Phase::Combat => &[
                L::Accept,
                L::Cancel,
                L::PlaceSpell,
                L::PlaceUnit,
                L::PlaySpellFinish,
            ],
            Phase::Targeting => &[L::Targeting, L::Choice, L::Cancel],
            Phase::Replacing => &[L::Replace, L::Cancel],
        }
    }

    #[must_use]
    pub fn accepts(self, label: ActionLabel) -> bool {
        self.accepted().contains(&label)
    }

    /// Phases in which the controller must answer before follow-ups run.
    #[must_use]
    pub fn awaits_input(self) -> bool {
        matches!(self, Phase::Mulligan | Phase::Targeting | Phase::Replacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        assert!(Phase::Idle.accepts(ActionLabel::PlayRequest));
        assert!(!Phase::Combat.accepts(ActionLabel::PlayRequest));
        assert!(!Phase::Combat.accepts(ActionLabel::DragEnemy));
        assert!(Phase::Targeting.accepts(ActionLabel::Cancel));
        assert!(!Phase::Targeting.accepts(ActionLabel::Accept));
        assert!(Phase::Mulligan.accepts(ActionLabel::Mulligan));
        assert!(!Phase::Replacing.accepts(ActionLabel::Accept));
    }

    #[test]
    fn test_awaits_input() {
        assert!(Phase::Targeting.awaits_input());
        assert!(!Phase::Idle.awaits_input());
    }
}
