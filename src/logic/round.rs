//! Round lifecycle.

use tracing::{debug, info};

use crate::cards::Keyword;
use crate::core::{EngineError, EntityId, GameState, RoundFlags, Team};
use crate::events::Event;
use crate::rules::Status;
use crate::zones::{Zone, ZonePosition};

impl GameState {
    /// Begin the next round: flags, attack token, mana, then one draw each.
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        self.round += 1;
        if self.round > self.config.max_rounds {
            info!("Round cap of {} reached", self.config.max_rounds);
            return self.end_game(Status::Tie);
        }

        let holder = if self.round % 2 == 1 {
            self.starting_team
        } else {
            self.starting_team.opponent()
        };
        for team in Team::ALL {
            let player = &mut self.players[team];
            player.flags = RoundFlags {
                attack_token: team == holder,
                ..RoundFlags::default()
            };
            player.played_this_round.clear();
            self.add_gems(team, 1);
            self.refill_mana(team);
        }
        self.initiative = holder;
        info!("Round {} starts, {} holds the attack token", self.round, holder);

        for team in Team::ALL {
            let player = &self.players[team];
            if !player.enlightened && player.mana.gems >= self.config.enlightenment_threshold {
                self.players[team].enlightened = true;
                debug!("{} is enlightened", team);
                self.trigger(Event::Enlightenment { team })?;
            }
        }

        self.trigger(Event::RoundStart { round: self.round })?;

        let empty: Vec<Team> = Team::ALL
            .into_iter()
            .filter(|&t| self.boards[t].deck.is_empty())
            .collect();
        match empty.as_slice() {
            [] => {
                for team in Team::ALL {
                    self.draw_cards(team, 1)?;
                }
                Ok(())
            }
            [team] => self.lose_by_draw_out(*team),
            _ => self.end_game(Status::Tie),
        }
    }

    /// Close the round: ephemeral deaths, temporary grants, regeneration,
    /// fleeting discards, the summon queue and floating mana.
    pub fn end_round(&mut self) -> Result<(), EngineError> {
        info!("Round {} ends", self.round);
        self.trigger(Event::RoundEnd { round: self.round })?;

        for team in Team::ALL {
            let ephemeral: Vec<EntityId> = self.with_keyword(team, Zone::Camp, Keyword::Ephemeral);
            for unit in ephemeral {
                if self.card(unit).is_some_and(|c| c.is_unit()) {
                    self.kill(unit, None)?;
                }
            }

            let mut buffed: Vec<EntityId> = self
                .cards
                .values()
                .filter(|c| c.owner == team && !c.temp_grants.is_empty())
                .map(|c| c.id)
                .collect();
            buffed.sort_unstable();
            for card in buffed {
                self.undo_temporary_grants(card)?;
            }

            for unit in self.with_keyword(team, Zone::Camp, Keyword::Regeneration) {
                if let Some(stats) = self.get_card_mut(unit)?.unit.as_mut() {
                    stats.damage = 0;
                }
            }

            for card in self.with_keyword(team, Zone::Hand, Keyword::Fleeting) {
                self.unsubscribe_all(card)?;
                self.move_card(card, Zone::Graveyard, ZonePosition::Top)?;
                self.trigger(Event::Discard { team, card })?;
            }

            let queued: Vec<EntityId> = self.boards[team].queue.iter().copied().collect();
            for card in queued {
                self.obliterate(card)?;
            }

            let max_floating = self.config.max_floating_mana;
            let mana = &mut self.players[team].mana;
            mana.floating = (mana.floating + mana.common).min(max_floating);
            mana.common = 0;
        }
        Ok(())
    }

    fn with_keyword(&self, team: Team, zone: Zone, keyword: Keyword) -> Vec<EntityId> {
        self.cards_in(team, zone)
            .into_iter()
            .filter(|&id| self.card(id).is_some_and(|c| c.has(keyword)))
            .collect()
    }
}
