//! Mana availability, reservation and spending.
//!
//! Spells draw from floating mana first and then from common mana; every
//! other card pays from common mana only. Spells placed on the stack
//! reserve their cost until they are cast.

use crate::core::{EngineError, GameState, Team};

impl GameState {
    /// Mana a team can still commit to a new card.
    #[must_use]
    pub fn available_mana(&self, team: Team, is_spell: bool) -> i32 {
        let mana = &self.players[team].mana;
        let reserved = self.reserved_mana(team);
        if is_spell {
            mana.common + mana.floating - reserved
        } else {
            mana.common - (reserved - mana.floating).max(0)
        }
    }

    /// Pay `cost` from the team's pool.
    ///
    /// Overspending means validation failed to do its job and is fatal.
    pub fn spend_mana(&mut self, team: Team, cost: i32, is_spell: bool) -> Result<(), EngineError> {
        let mana = &mut self.players[team].mana;
        let available = mana.available(is_spell);
        if cost > available {
            return Err(EngineError::ManaOverspend {
                team,
                cost,
                available,
            });
        }

        let mut remaining = cost.max(0);
        if is_spell {
            let from_floating = remaining.min(mana.floating);
            mana.floating -= from_floating;
            remaining -= from_floating;
        }
        mana.common -= remaining;
        Ok(())
    }

    /// Gain mana gems up to the configured maximum.
    pub fn add_gems(&mut self, team: Team, amount: i32) {
        let max = self.config.max_mana;
        let mana = &mut self.players[team].mana;
        mana.gems = (mana.gems + amount).clamp(0, max);
    }

    /// Refill spendable mana to the gem count.
    pub fn refill_mana(&mut self, team: Team) {
        let mana = &mut self.players[team].mana;
        mana.common = mana.gems;
    }
}
