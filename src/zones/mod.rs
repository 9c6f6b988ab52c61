//! Zone system for card locations.
//!
//! Every card sits in exactly one [`Zone`]. Per-team containers live in a
//! [`Board`]; the spell stack is shared and lives in
//! [`SpellStack`](crate::stack::SpellStack). Moving a card updates both the
//! container and the card's recorded zone and position in one step.
//!
//! ## Key Types
//!
//! - `Zone`: Where a card is
//! - `Board`: Hand, deck, camp, battlefield lanes, graveyard and friends
//! - `ZonePosition`: Position specifier for ordered zones

pub mod board;
pub mod movement;

pub use board::{Board, ZonePosition};

use serde::{Deserialize, Serialize};

/// Location of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Created but not placed anywhere yet.
    Nowhere,
    Deck,
    Hand,
    Camp,
    Battlefield,
    SpellStack,
    /// Held in the play buffer while a field card is being played.
    Pending,
    /// Waiting for a free camp slot.
    Queue,
    Graveyard,
    /// Spells after they were cast.
    Spellyard,
    /// Obliterated cards.
    Tossed,
}

impl Zone {
    /// Zones whose cards may own subscribed effects.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(
            self,
            Zone::Hand
                | Zone::Camp
                | Zone::Battlefield
                | Zone::SpellStack
                | Zone::Pending
                | Zone::Queue
                | Zone::Graveyard
        )
    }

    /// Camp or battlefield.
    #[must_use]
    pub const fn is_field(self) -> bool {
        matches!(self, Zone::Camp | Zone::Battlefield)
    }
}
