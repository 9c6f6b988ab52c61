//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card code.
//! For example, a 3-cost 2/3 unit with Tough keeps those numbers in its
//! definition forever; buffs, damage and zone live on the [`Card`] instance.
//!
//! [`Card`]: super::Card

use serde::{Deserialize, Serialize};

use super::keywords::{Keyword, KeywordSet};
use crate::effects::EffectTemplate;

/// Kind-specific payload of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Unit { power: i32, health: i32 },
    Spell,
    Landmark,
    Trap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuperType {
    #[default]
    None,
    Champion,
    Skill,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    None,
    Common,
    Rare,
    Epic,
    Champion,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use lor_engine::cards::{CardDefinition, Keyword};
///
/// let guard = CardDefinition::unit("01GU001", "Shield Bearer", 3, 2, 3)
///     .with_keyword(Keyword::Tough)
///     .with_region("Demacia");
///
/// assert!(guard.is_unit());
/// assert!(guard.keywords.contains(Keyword::Tough));
/// ```
#[derive(Clone, Debug)]
pub struct CardDefinition {
    /// Catalogue code, unique per definition.
    pub code: String,
    pub name: String,
    pub description: String,
    pub region: String,
    /// Subgroup such as a tribe.
    pub group: String,
    pub super_type: SuperType,
    pub rarity: Rarity,
    pub cost: i32,
    pub collectible: bool,
    pub kind: CardKind,
    pub keywords: KeywordSet,
    /// Effects every instance of this card starts with.
    pub effects: Vec<EffectTemplate>,
}

impl CardDefinition {
    fn base(code: impl Into<String>, name: impl Into<String>, cost: i32, kind: CardKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            region: String::new(),
            group: String::new(),
            super_type: SuperType::None,
            rarity: Rarity::None,
            cost,
            collectible: true,
            kind,
            keywords: KeywordSet::empty(),
            effects: Vec::new(),
        }
    }

    /// A unit with base power and health.
    #[must_use]
    pub fn unit(
        code: impl Into<String>,
        name: impl Into<String>,
        cost: i32,
        power: i32,
        health: i32,
    ) -> Self {
        Self::base(code, name, cost, CardKind::Unit { power, health })
    }

    /// A spell of the given speed keyword.
    #[must_use]
    pub fn spell(code: impl Into<String>, name: impl Into<String>, cost: i32, speed: Keyword) -> Self {
        Self::base(code, name, cost, CardKind::Spell).with_keyword(speed)
    }

    /// A free burst spell created by other cards, never drawn.
    #[must_use]
    pub fn skill(code: impl Into<String>, name: impl Into<String>) -> Self {
        let mut skill = Self::base(code, name, 0, CardKind::Spell).with_keyword(Keyword::Burst);
        skill.super_type = SuperType::Skill;
        skill.collectible = false;
        skill
    }

    #[must_use]
    pub fn landmark(code: impl Into<String>, name: impl Into<String>, cost: i32) -> Self {
        Self::base(code, name, cost, CardKind::Landmark)
    }

    #[must_use]
    pub fn trap(code: impl Into<String>, name: impl Into<String>) -> Self {
        let mut trap = Self::base(code, name, 0, CardKind::Trap);
        trap.collectible = false;
        trap
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: &[Keyword]) -> Self {
        for &keyword in keywords {
            self.keywords.insert(keyword);
        }
        self
    }

    /// Add an effect template (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Mark as a champion.
    #[must_use]
    pub fn champion(mut self) -> Self {
        self.super_type = SuperType::Champion;
        self.rarity = Rarity::Champion;
        self
    }

    #[must_use]
    pub fn uncollectible(mut self) -> Self {
        self.collectible = false;
        self
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self.kind, CardKind::Unit { .. })
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CardKind::Spell)
    }

    /// Units and landmarks occupy camp slots.
    #[must_use]
    pub fn is_field_card(&self) -> bool {
        matches!(self.kind, CardKind::Unit { .. } | CardKind::Landmark)
    }

    #[must_use]
    pub fn is_skill(&self) -> bool {
        self.super_type == SuperType::Skill
    }

    #[must_use]
    pub fn is_champion(&self) -> bool {
        self.super_type == SuperType::Champion
    }

    /// Speed keyword of a spell, `None` for other kinds.
    ///
    /// Spells defined without a speed are treated as slow.
    #[must_use]
    pub fn spell_speed(&self) -> Option<Keyword> {
        if !self.is_spell() {
            return None;
        }
        [Keyword::Burst, Keyword::Focus, Keyword::Fast, Keyword::Slow]
            .into_iter()
            .find(|k| self.keywords.contains(*k))
            .or(Some(Keyword::Slow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_builder() {
        let unit = CardDefinition::unit("U1", "Brute", 4, 5, 4)
            .with_keywords(&[Keyword::Overwhelm, Keyword::Tough])
            .champion();

        assert_eq!(unit.kind, CardKind::Unit { power: 5, health: 4 });
        assert!(unit.is_field_card());
        assert!(unit.is_champion());
        assert_eq!(unit.keywords.len(), 2);
        assert_eq!(unit.spell_speed(), None);
    }

    #[test]
    fn test_spell_speed() {
        let bolt = CardDefinition::spell("S1", "Bolt", 2, Keyword::Fast);
        assert_eq!(bolt.spell_speed(), Some(Keyword::Fast));

        let skill = CardDefinition::skill("K1", "Strike Back");
        assert!(skill.is_skill());
        assert!(!skill.collectible);
        assert_eq!(skill.spell_speed(), Some(Keyword::Burst));
    }

    #[test]
    fn test_landmark_is_field_card() {
        let landmark = CardDefinition::landmark("L1", "Monolith", 3);
        assert!(landmark.is_field_card());
        assert!(!landmark.is_unit());
    }
}
