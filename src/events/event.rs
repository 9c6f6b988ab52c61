//! Event kinds and payloads.
//!
//! The catalogue of events is fixed. Each [`Event`] variant carries the
//! entities involved so subscribed effects can decide whether they care.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, Team};
use crate::rules::Status;

/// Kind of a game event, used to index subscriber lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Attack,
    Block,
    Cast,
    Daybreak,
    Die,
    Discard,
    DrawCard,
    Enlightenment,
    GameEnd,
    NexusDamage,
    NexusStrike,
    Nightfall,
    Play,
    Recall,
    RoundEnd,
    RoundStart,
    Scout,
    Slay,
    Strike,
    Summon,
    Target,
    UnitDamage,
}

/// A fired event with its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// An attack was declared.
    Attack {
        team: Team,
        attackers: SmallVec<[EntityId; 6]>,
    },
    /// Blockers were declared.
    Block {
        team: Team,
        blockers: SmallVec<[EntityId; 6]>,
    },
    Cast { team: Team, spell: EntityId },
    /// First card played this round.
    Daybreak { team: Team, card: EntityId },
    Die {
        team: Team,
        unit: EntityId,
        killer: Option<EntityId>,
    },
    Discard { team: Team, card: EntityId },
    DrawCard { team: Team, card: EntityId },
    Enlightenment { team: Team },
    GameEnd { status: Status },
    /// A nexus lost health. `team` owns the nexus.
    NexusDamage {
        team: Team,
        source: EntityId,
        amount: i32,
    },
    /// An unblocked attacker struck the enemy nexus.
    NexusStrike {
        team: Team,
        striker: EntityId,
        amount: i32,
    },
    /// A card played after the first one this round.
    Nightfall { team: Team, card: EntityId },
    Play { team: Team, card: EntityId },
    Recall { team: Team, card: EntityId },
    RoundEnd { round: u32 },
    RoundStart { round: u32 },
    /// An all-scout attack refunded the attack token.
    Scout { team: Team },
    Slay { killer: EntityId, victim: EntityId },
    Strike {
        striker: EntityId,
        target: EntityId,
        amount: i32,
    },
    Summon { team: Team, card: EntityId },
    /// Targets were chosen for an effect of `source`.
    Target {
        team: Team,
        source: EntityId,
        targets: SmallVec<[EntityId; 4]>,
    },
    UnitDamage {
        unit: EntityId,
        source: Option<EntityId>,
        amount: i32,
    },
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Attack { .. } => EventKind::Attack,
            Self::Block { .. } => EventKind::Block,
            Self::Cast { .. } => EventKind::Cast,
            Self::Daybreak { .. } => EventKind::Daybreak,
            Self::Die { .. } => EventKind::Die,
            Self::Discard { .. } => EventKind::Discard,
            Self::DrawCard { .. } => EventKind::DrawCard,
            Self::Enlightenment { .. } => EventKind::Enlightenment,
            Self::GameEnd { .. } => EventKind::GameEnd,
            Self::NexusDamage { .. } => EventKind::NexusDamage,
            Self::NexusStrike { .. } => EventKind::NexusStrike,
            Self::Nightfall { .. } => EventKind::Nightfall,
            Self::Play { .. } => EventKind::Play,
            Self::Recall { .. } => EventKind::Recall,
            Self::RoundEnd { .. } => EventKind::RoundEnd,
            Self::RoundStart { .. } => EventKind::RoundStart,
            Self::Scout { .. } => EventKind::Scout,
            Self::Slay { .. } => EventKind::Slay,
            Self::Strike { .. } => EventKind::Strike,
            Self::Summon { .. } => EventKind::Summon,
            Self::Target { .. } => EventKind::Target,
            Self::UnitDamage { .. } => EventKind::UnitDamage,
        }
    }

    /// The entity the event is primarily about.
    #[must_use]
    pub fn subject(&self) -> Option<EntityId> {
        match self {
            Self::Cast { spell, .. } => Some(*spell),
            Self::Daybreak { card, .. }
            | Self::Discard { card, .. }
            | Self::DrawCard { card, .. }
            | Self::Nightfall { card, .. }
            | Self::Play { card, .. }
            | Self::Recall { card, .. }
            | Self::Summon { card, .. } => Some(*card),
            Self::Die { unit, .. } | Self::UnitDamage { unit, .. } => Some(*unit),
            Self::NexusStrike { striker, .. } | Self::Strike { striker, .. } => Some(*striker),
            Self::Slay { killer, .. } => Some(*killer),
            Self::Target { source, .. } => Some(*source),
            Self::NexusDamage { team, .. } | Self::Enlightenment { team } | Self::Scout { team } => {
                Some(EntityId::nexus(*team))
            }
            Self::Attack { .. } | Self::Block { .. } | Self::GameEnd { .. } => None,
            Self::RoundEnd { .. } | Self::RoundStart { .. } => None,
        }
    }

    /// Whether `entity` is the subject or one of the listed participants.
    #[must_use]
    pub fn concerns(&self, entity: EntityId) -> bool {
        match self {
            Self::Attack { attackers, .. } => attackers.contains(&entity),
            Self::Block { blockers, .. } => blockers.contains(&entity),
            _ => self.subject() == Some(entity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_kind() {
        let event = Event::Play {
            team: Team::Blue,
            card: EntityId(5),
        };
        assert_eq!(event.kind(), EventKind::Play);
        assert_eq!(event.subject(), Some(EntityId(5)));
    }

    #[test]
    fn test_concerns_lists() {
        let event = Event::Attack {
            team: Team::Red,
            attackers: smallvec![EntityId(3), EntityId(4)],
        };
        assert!(event.concerns(EntityId(4)));
        assert!(!event.concerns(EntityId(5)));
        assert_eq!(event.subject(), None);
    }

    #[test]
    fn test_nexus_subject() {
        let event = Event::NexusDamage {
            team: Team::Red,
            source: EntityId(9),
            amount: 2,
        };
        assert_eq!(event.subject(), Some(EntityId::nexus(Team::Red)));
    }
}
