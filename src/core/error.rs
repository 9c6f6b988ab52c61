//! Error types.
//!
//! Two failure channels exist and they never mix:
//!
//! - [`InvalidAction`]: a controller submitted an action the current phase
//!   does not accept or whose payload fails validation. State is untouched;
//!   the driver retries and eventually substitutes a fallback.
//! - [`EngineError`]: an invariant the validity gate should have protected
//!   was broken. These propagate unchanged to the caller of `Game::step()`.
//!
//! Running out of cards is neither: it is a game outcome recorded in
//! [`Status`](crate::rules::Status).

use thiserror::Error;

use super::action::ActionLabel;
use super::entity::EntityId;
use super::player::Team;
use crate::events::EffectId;
use crate::game::DeckError;
use crate::grants::GrantId;
use crate::rules::Phase;
use crate::zones::Zone;

/// Why an action was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("the game is already over")]
    GameOver,

    #[error("{label:?} is not accepted during {phase:?}")]
    LabelNotAccepted { label: ActionLabel, phase: Phase },

    #[error("{label:?} is only issued by the engine itself")]
    FollowUpOnly { label: ActionLabel },

    #[error("{got} acted but it is {expected}'s move")]
    WrongTeam { expected: Team, got: Team },

    #[error("index {index} out of range for container of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("index {index} was given more than once")]
    DuplicateIndex { index: usize },

    #[error("card costs {cost} but only {available} mana is available")]
    NotEnoughMana { cost: i32, available: i32 },

    #[error("{card} has the wrong card type for this action")]
    WrongCardType { card: EntityId },

    #[error("{card} cannot be cast at this moment")]
    WrongSpellSpeed { card: EntityId },

    #[error("another card is already being played")]
    BufferBusy,

    #[error("the camp is full")]
    CampFull,

    #[error("the battlefield is full")]
    BattlefieldFull,

    #[error("{team} does not hold the attack token")]
    NoAttackToken { team: Team },

    #[error("{unit} cannot attack")]
    CannotAttack { unit: EntityId },

    #[error("{unit} cannot block the attacker in lane {lane}")]
    CannotBlock { unit: EntityId, lane: usize },

    #[error("blockers were already declared this combat")]
    BlocksAlreadyDeclared,

    #[error("lane {lane} is not available")]
    LaneUnavailable { lane: usize },

    #[error("the unit in lane {lane} cannot challenge")]
    NoChallenger { lane: usize },

    #[error("targets do not satisfy the pending request: {reason}")]
    InvalidTargets { reason: String },

    #[error("no targeting or choice is pending")]
    NothingPending,

    #[error("there is nothing to cancel")]
    NothingToCancel,

    #[error("mulligan needs {expected} flags, got {got}")]
    MulliganLength { expected: usize, got: usize },

    #[error("the deck holds {available} cards, {requested} requested")]
    NotEnoughCards { requested: usize, available: usize },
}

/// A broken engine invariant. Not recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("action executed without passing validation: {0}")]
    Rejected(#[from] InvalidAction),

    #[error("spell buffer and play buffer are both populated")]
    BothPlayBuffersPopulated,

    #[error("{team} spends {cost} mana with only {available} available")]
    ManaOverspend { team: Team, cost: i32, available: i32 },

    #[error("{effect} fired while its owner {owner} sits in {zone:?}")]
    OrphanedEffect {
        effect: EffectId,
        owner: EntityId,
        zone: Zone,
    },

    #[error("{team} needs {requested} cards from a deck of {available}")]
    DeckUnderflow {
        team: Team,
        requested: usize,
        available: usize,
    },

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown effect {0}")]
    UnknownEffect(EffectId),

    #[error("unknown grant {0}")]
    UnknownGrant(GrantId),

    #[error("{0} was already undone")]
    GrantAlreadyUndone(GrantId),

    #[error("{0} is not a unit")]
    NotAUnit(EntityId),

    #[error("no card with code {0:?} in the catalogue")]
    UnknownCardCode(String),

    #[error("{card} expected in {expected:?} but found in {found:?}")]
    ZoneMismatch {
        card: EntityId,
        expected: Zone,
        found: Zone,
    },

    #[error("follow-up action found no pending {0}")]
    MissingPending(&'static str),

    #[error("no valid fallback action for {team} during {phase:?}")]
    NoValidFallback { team: Team, phase: Phase },

    #[error("{team} deck is invalid: {source}")]
    InvalidDeck {
        team: Team,
        #[source]
        source: DeckError,
    },
}
