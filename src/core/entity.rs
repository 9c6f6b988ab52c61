//! Entity identification system.
//!
//! Every game object a card effect can point at (a nexus or a card) has a
//! unique `EntityId`. The id doubles as the handle used by zone containers,
//! effect subscriptions and grants, so none of them own the card itself.
//!
//! ## ID Layout
//!
//! - `0..2`: Reserved for the two nexuses (one per team)
//! - `2..`: Cards, allocated monotonically by `GameState`
//!
//! ```
//! use lor_engine::core::{EntityId, Team};
//!
//! let blue_nexus = EntityId::nexus(Team::Blue);
//! assert!(blue_nexus.is_nexus());
//! assert_eq!(blue_nexus.as_team(), Some(Team::Blue));
//!
//! let card = EntityId(10);
//! assert!(!card.is_nexus());
//! ```

use serde::{Deserialize, Serialize};

use super::player::Team;

/// Unique identifier for a nexus or a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Number of ids reserved for nexuses.
    pub const NEXUS_COUNT: u32 = 2;

    /// The first id available for cards.
    pub const FIRST_CARD: EntityId = EntityId(Self::NEXUS_COUNT);

    /// Entity id of a team's nexus.
    #[must_use]
    pub const fn nexus(team: Team) -> Self {
        Self(team.index() as u32)
    }

    /// Check if this entity id refers to a nexus.
    #[must_use]
    pub const fn is_nexus(self) -> bool {
        self.0 < Self::NEXUS_COUNT
    }

    /// The team owning this nexus, or `None` for card ids.
    #[must_use]
    pub fn as_team(self) -> Option<Team> {
        match self.0 {
            0 => Some(Team::Blue),
            1 => Some(Team::Red),
            _ => None,
        }
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_team() {
            Some(team) => write!(f, "Nexus({team})"),
            None => write!(f, "Entity({})", self.0),
        }
    }
}
