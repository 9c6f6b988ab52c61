//! Game outcome.

use serde::{Deserialize, Serialize};

use crate::core::Team;

/// How a team won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// The opposing nexus reached zero health.
    Nexus,
    /// The opponent had to draw from an empty deck.
    DrawOut,
}

/// Result of a game, queried after every action cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Game still in progress.
    #[default]
    Ongoing,
    /// Round cap reached, or both teams lost at once.
    Tie,
    Win { team: Team, reason: WinReason },
}

impl Status {
    #[must_use]
    pub fn is_ongoing(self) -> bool {
        self == Status::Ongoing
    }

    /// Check if the game ended.
    #[must_use]
    pub fn is_over(self) -> bool {
        !self.is_ongoing()
    }

    #[must_use]
    pub fn winner(self) -> Option<Team> {
        match self {
            Status::Win { team, .. } => Some(team),
            _ => None,
        }
    }
}
