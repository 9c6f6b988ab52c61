//! Applying and undoing grants.

use tracing::debug;

use super::grant::{Grant, GrantId, GrantKind};
use crate::core::{EngineError, EntityId, GameState};

impl GameState {
    /// Apply a grant from `bestowing` to `bestowed` and attach it.
    ///
    /// Permanent grants change base values; temporary grants change the
    /// per-round deltas and are undone at round end.
    pub fn grant(
        &mut self,
        bestowing: EntityId,
        bestowed: EntityId,
        kind: GrantKind,
        permanent: bool,
    ) -> Result<GrantId, EngineError> {
        let mut grant = Grant::new(bestowing, bestowed, kind, permanent);
        self.apply_grant(&mut grant)?;
        let id = self.grants.insert(grant);

        let card = self.get_card_mut(bestowed)?;
        if permanent {
            card.grants.push(id);
        } else {
            card.temp_grants.push(id);
        }
        debug!("{} from {} applied to {}", id, bestowing, bestowed);
        Ok(id)
    }

    fn apply_grant(&mut self, grant: &mut Grant) -> Result<(), EngineError> {
        let target = grant.bestowed;
        match &grant.kind {
            GrantKind::Stats { power, health } => {
                let unit = self.unit_mut(target)?;
                if grant.permanent {
                    unit.power_base += power;
                    unit.health_base += health;
                } else {
                    unit.power_delta += power;
                    unit.health_delta += health;
                }
            }
            GrantKind::Mana { delta } => {
                let card = self.get_card_mut(target)?;
                if grant.permanent {
                    card.mana_base_delta += delta;
                } else {
                    card.mana_delta += delta;
                }
            }
            GrantKind::Keyword { keyword, add } => {
                let keywords = &mut self.get_card_mut(target)?.keywords;
                grant.changed = if *add {
                    keywords.insert(*keyword)
                } else {
                    keywords.remove(*keyword)
                };
            }
            GrantKind::Effect { template } => {
                grant.effect = Some(self.attach_effect(target, template)?);
            }
        }
        Ok(())
    }

    /// Reverse a grant. Each grant can be undone exactly once.
    ///
    /// Removing health never kills: damage is clamped so at least one
    /// health point remains.
    pub fn undo_grant(&mut self, id: GrantId) -> Result<(), EngineError> {
        let grant = self.grants.get(id).ok_or(EngineError::UnknownGrant(id))?;
        if grant.undone {
            return Err(EngineError::GrantAlreadyUndone(id));
        }
        let grant = grant.clone();
        let target = grant.bestowed;

        match &grant.kind {
            GrantKind::Stats { power, health } => {
                let unit = self.unit_mut(target)?;
                if grant.permanent {
                    unit.power_base -= power;
                    unit.health_base -= health;
                } else {
                    unit.power_delta -= power;
                    unit.health_delta -= health;
                }
                if *health > 0 {
                    unit.damage = unit.damage.min((unit.max_health() - 1).max(0));
                }
            }
            GrantKind::Mana { delta } => {
                let card = self.get_card_mut(target)?;
                if grant.permanent {
                    card.mana_base_delta -= delta;
                } else {
                    card.mana_delta -= delta;
                }
            }
            GrantKind::Keyword { keyword, add } => {
                if grant.changed {
                    let keywords = &mut self.get_card_mut(target)?.keywords;
                    if *add {
                        keywords.remove(*keyword);
                    } else {
                        keywords.insert(*keyword);
                    }
                }
            }
            GrantKind::Effect { .. } => {
                if let Some(effect) = grant.effect {
                    self.detach_effect(target, effect)?;
                }
            }
        }

        if let Some(stored) = self.grants.get_mut(id) {
            stored.undone = true;
        }
        let card = self.get_card_mut(target)?;
        card.grants.retain(|&g| g != id);
        card.temp_grants.retain(|&g| g != id);
        debug!("{} undone on {}", id, target);
        Ok(())
    }

    /// Undo every temporary grant on a card, newest first.
    pub fn undo_temporary_grants(&mut self, card: EntityId) -> Result<(), EngineError> {
        let grants = self.get_card(card)?.temp_grants.clone();
        for id in grants.into_iter().rev() {
            self.undo_grant(id)?;
        }
        Ok(())
    }

    /// Undo every grant on a card, temporary and permanent.
    pub fn strip_grants(&mut self, card: EntityId) -> Result<(), EngineError> {
        self.undo_temporary_grants(card)?;
        let grants = self.get_card(card)?.grants.clone();
        for id in grants.into_iter().rev() {
            self.undo_grant(id)?;
        }
        Ok(())
    }
}
