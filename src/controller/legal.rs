//! Legal action enumeration.
//!
//! Candidates are generated per phase and kept when they pass validation,
//! so this list never disagrees with what the engine accepts. Multi-unit
//! moves are represented by single-unit steps plus one all-in move.

use crate::core::{Action, GameState, Team};
use crate::effects::TargetSelector;
use crate::rules::Phase;

/// Every action `team` could submit right now, in a stable order.
#[must_use]
pub fn legal_actions(state: &GameState, team: Team) -> Vec<Action> {
    if state.status.is_over() {
        return Vec::new();
    }
    candidates(state, team)
        .into_iter()
        .filter(|action| state.validate(action).is_ok())
        .collect()
}

fn candidates(state: &GameState, team: Team) -> Vec<Action> {
    let mut out = Vec::new();
    match state.phase {
        Phase::Mulligan => {
            let len = state.boards[team].hand.len();
            out.push(Action::Mulligan {
                team,
                replace: vec![false; len],
            });
            out.push(Action::Mulligan {
                team,
                replace: vec![true; len],
            });
        }
        Phase::Targeting => {
            if let Some(choice) = state.choices.top() {
                out.extend((0..choice.options.len()).map(|index| Action::Choice { team, index }));
            } else if let Some(pending) = state.targeting.top() {
                let candidates = TargetSelector::new(&pending.spec, pending.team)
                    .with_source(pending.card)
                    .valid_targets(state);
                out.push(Action::targets(team, &[]));
                out.extend(candidates.iter().map(|&t| Action::targets(team, &[t])));
                let max = pending.spec.max_count(candidates.len());
                if max > 1 {
                    out.push(Action::targets(team, &candidates[..max]));
                }
            }
            out.push(Action::Cancel { team });
        }
        Phase::Replacing => {
            let camp = state.boards[team].camp.len();
            out.extend((0..camp).map(|camp_index| Action::Replace { team, camp_index }));
            out.push(Action::Cancel { team });
        }
        Phase::Idle | Phase::Combat => {
            out.push(Action::Accept { team });
            out.push(Action::Cancel { team });
            field_candidates(state, team, &mut out);
        }
    }
    out
}

fn field_candidates(state: &GameState, team: Team, out: &mut Vec<Action>) {
    let board = &state.boards[team];
    let enemy = &state.boards[team.opponent()];

    for index in 0..board.hand.len() {
        out.push(Action::PlayRequest {
            team,
            hand_index: index,
        });
        out.push(Action::PlaceSpell {
            team,
            index,
            to_stack: true,
        });
    }
    for index in 0..state.spell_buffer.len() {
        out.push(Action::PlaceSpell {
            team,
            index,
            to_stack: false,
        });
    }

    let camp = board.camp.len();
    if state.in_combat() {
        let lanes = enemy.battlefield.len();
        for index in 0..camp {
            for lane in 0..lanes {
                out.push(Action::block(team, &[(index, lane)]));
            }
        }
    } else {
        out.extend((0..camp).map(|index| Action::attack(team, &[index])));
        if camp > 1 {
            let all: Vec<usize> = (0..camp).collect();
            out.push(Action::attack(team, &all));
        }
        for lane in 0..board.battlefield.len() {
            for camp_index in 0..enemy.camp.len() {
                out.push(Action::DragEnemy {
                    team,
                    lane,
                    camp_index,
                });
            }
        }
    }

    for lane in 0..board.battlefield.len() {
        out.push(Action::PlaceUnit {
            team,
            indices: vec![lane],
            lanes: Vec::new(),
            to_battlefield: false,
        });
    }
}
