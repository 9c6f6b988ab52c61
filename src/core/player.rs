//! Team identification and per-team player data.
//!
//! ## Team
//!
//! The two opposing sides of a game.
//!
//! ## TeamMap
//!
//! Per-team storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `Team`.
//!
//! ## Player
//!
//! Nexus, mana pool and per-round flags. Card containers live in
//! [`Board`](crate::zones::Board).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::cards::KeywordSet;

/// One of the two opposing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    /// Both teams, in index order.
    pub const ALL: [Team; 2] = [Team::Blue, Team::Red];

    /// Get the 0-based team index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::Blue => 0,
            Team::Red => 1,
        }
    }

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Blue => write!(f, "Blue"),
            Team::Red => write!(f, "Red"),
        }
    }
}

/// Per-team data storage with O(1) access.
///
/// ```
/// use lor_engine::core::{Team, TeamMap};
///
/// let mut health: TeamMap<i32> = TeamMap::with_value(20);
/// health[Team::Red] -= 3;
/// assert_eq!(health[Team::Blue], 20);
/// assert_eq!(health[Team::Red], 17);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; 2],
}

impl<T> TeamMap<T> {
    /// Create a new TeamMap with values from a factory function.
    pub fn new(factory: impl Fn(Team) -> T) -> Self {
        Self {
            data: [factory(Team::Blue), factory(Team::Red)],
        }
    }

    /// Create a new TeamMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new TeamMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Iterate over (Team, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Team, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Team, &mut T)> {
        Team::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Team> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<Team> for TeamMap<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        &mut self.data[team.index()]
    }
}

/// A team's mana pool.
///
/// `gems` is the round capacity, `common` is spendable this round and
/// `floating` is spell-only mana carried over from previous rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mana {
    pub gems: i32,
    pub common: i32,
    pub floating: i32,
}

impl Mana {
    /// Mana available to pay for a card.
    #[must_use]
    pub fn available(&self, is_spell: bool) -> i32 {
        if is_spell {
            self.common + self.floating
        } else {
            self.common
        }
    }
}

/// Flags reset at the start of every round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFlags {
    /// May declare an attack this round.
    pub attack_token: bool,
    /// The once-per-round scout refund has been used.
    pub scout_token: bool,
    /// Damaged the enemy nexus this round.
    pub plunder: bool,
    /// The next play is the first of the round.
    pub daybreak: bool,
    /// A card was already played this round.
    pub nightfall: bool,
    /// Played or cast a card this round.
    pub played: bool,
    /// Passed without acting since the last action.
    pub passed: bool,
}

impl Default for RoundFlags {
    fn default() -> Self {
        Self {
            attack_token: false,
            scout_token: false,
            plunder: false,
            daybreak: true,
            nightfall: false,
            played: false,
            passed: false,
        }
    }
}

/// A team's life-total entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nexus {
    pub health: i32,
    pub keywords: KeywordSet,
}

/// Everything a team owns besides its cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub team: Team,
    pub nexus: Nexus,
    pub mana: Mana,
    pub flags: RoundFlags,
    /// Reached the enlightenment threshold (fires once).
    pub enlightened: bool,
    /// Cards played this round, in play order.
    pub played_this_round: Vec<super::EntityId>,
}

impl Player {
    /// Create a player with a fresh nexus.
    #[must_use]
    pub fn new(team: Team, nexus_health: i32) -> Self {
        Self {
            team,
            nexus: Nexus {
                health: nexus_health,
                keywords: KeywordSet::empty(),
            },
            mana: Mana::default(),
            flags: RoundFlags::default(),
            enlightened: false,
            played_this_round: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_basics() {
        assert_eq!(Team::Blue.index(), 0);
        assert_eq!(Team::Red.index(), 1);
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(format!("{}", Team::Red), "Red");
    }

    #[test]
    fn test_team_map_new() {
        let map: TeamMap<usize> = TeamMap::new(|t| t.index() * 10);

        assert_eq!(map[Team::Blue], 0);
        assert_eq!(map[Team::Red], 10);
    }

    #[test]
    fn test_team_map_iter() {
        let map: TeamMap<i32> = TeamMap::new(|t| t.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Team::Blue, &0), (Team::Red, &1)]);
    }

    #[test]
    fn test_mana_available() {
        let mana = Mana {
            gems: 5,
            common: 2,
            floating: 3,
        };

        assert_eq!(mana.available(true), 5);
        assert_eq!(mana.available(false), 2);
    }

    #[test]
    fn test_round_flags_default() {
        let flags = RoundFlags::default();
        assert!(flags.daybreak);
        assert!(!flags.nightfall);
        assert!(!flags.attack_token);
    }
}
