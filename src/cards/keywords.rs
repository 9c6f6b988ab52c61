//! Keywords and keyword sets.
//!
//! Keywords are a closed enum; a card's current keywords are stored as a
//! 64-bit set so copying, comparing and granting them costs nothing.

use serde::{Deserialize, Serialize};

/// A rules keyword.
///
/// Spell speeds (`Slow`, `Fast`, `Burst`, `Focus`) are keywords as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keyword {
    Barrier,
    Burst,
    CantBlock,
    Challenger,
    DoubleAttack,
    Elusive,
    Ephemeral,
    Fast,
    Fearsome,
    Fleeting,
    Focus,
    Immobile,
    LastBreath,
    Lifesteal,
    Overwhelm,
    QuickAttack,
    Regeneration,
    Scout,
    Slow,
    Tough,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Keyword; 20] = [
        Keyword::Barrier,
        Keyword::Burst,
        Keyword::CantBlock,
        Keyword::Challenger,
        Keyword::DoubleAttack,
        Keyword::Elusive,
        Keyword::Ephemeral,
        Keyword::Fast,
        Keyword::Fearsome,
        Keyword::Fleeting,
        Keyword::Focus,
        Keyword::Immobile,
        Keyword::LastBreath,
        Keyword::Lifesteal,
        Keyword::Overwhelm,
        Keyword::QuickAttack,
        Keyword::Regeneration,
        Keyword::Scout,
        Keyword::Slow,
        Keyword::Tough,
    ];

    const fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

/// Set of keywords backed by a bitmask.
///
/// ```
/// use lor_engine::cards::{Keyword, KeywordSet};
///
/// let mut set = KeywordSet::from_slice(&[Keyword::Tough, Keyword::Elusive]);
/// assert!(set.contains(Keyword::Tough));
/// set.remove(Keyword::Tough);
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordSet(u64);

impl KeywordSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn from_slice(keywords: &[Keyword]) -> Self {
        let mut set = Self::empty();
        for &keyword in keywords {
            set.insert(keyword);
        }
        set
    }

    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    /// Insert a keyword, returning whether it was newly added.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        let added = !self.contains(keyword);
        self.0 |= keyword.bit();
        added
    }

    /// Remove a keyword, returning whether it was present.
    pub fn remove(&mut self, keyword: Keyword) -> bool {
        let present = self.contains(keyword);
        self.0 &= !keyword.bit();
        present
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = Self::empty();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}
