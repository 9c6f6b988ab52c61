//! Action state machine tests.
//!
//! These exercise the phase transitions and buffers through `apply`, the
//! same entry point the game driver uses after validation.

use std::rc::Rc;

use proptest::prelude::*;

use lor_engine::cards::{CardDefinition, CardRegistry, Keyword};
use lor_engine::core::{Action, Config, EntityId, GameState, InvalidAction, Team, TeamMap};
use lor_engine::effects::{EffectTemplate, TargetSpec};
use lor_engine::events::{Event, EventKind};
use lor_engine::game::{DeckList, Game};
use lor_engine::rules::Phase;
use lor_engine::zones::Zone;

fn catalogue() -> Rc<CardRegistry> {
    let zap = |amount: i32| {
        EffectTemplate::on_play(move |state, _, ctx| {
            for &target in &ctx.targets {
                state.damage_unit(target, amount, Some(ctx.owner))?;
            }
            Ok(())
        })
        .with_targeter(TargetSpec::unit())
    };

    Rc::new(
        CardRegistry::new()
            .with(CardDefinition::unit("GRUNT", "Grunt", 1, 2, 3))
            .with(
                CardDefinition::unit("ARCHER", "Twin Archer", 2, 1, 1)
                    .with_effect(zap(1))
                    .with_effect(zap(2)),
            )
            .with(CardDefinition::unit("DUELIST", "Duelist", 2, 3, 2).with_keyword(Keyword::Challenger))
            .with(CardDefinition::spell("SLOW", "Slow Study", 1, Keyword::Slow))
            .with(CardDefinition::spell("FAST", "Quick Study", 1, Keyword::Fast)),
    )
}

fn state() -> GameState {
    let mut state = GameState::new(Config::default(), catalogue(), 23);
    state.phase = Phase::Idle;
    state.mulligan_done = TeamMap::with_value(true);
    state.round = 1;
    state.initiative = Team::Blue;
    for team in Team::ALL {
        state.players[team].mana.common = 6;
    }
    state
}

/// Run queued follow-ups the way `Game::step` does.
fn drain(state: &mut GameState) {
    while !state.phase.awaits_input() {
        let Some(action) = state.action_buffer.pop_front() else {
            break;
        };
        state.apply_follow_up(&action).unwrap();
    }
}

/// Test that the newest targeting request is answered first.
#[test]
fn test_targeting_is_lifo() {
    let mut state = state();
    let left = state.create_card_in("GRUNT", Team::Red, None, Zone::Camp).unwrap();
    let right = state.create_card_in("GRUNT", Team::Red, None, Zone::Camp).unwrap();
    let archer = state.create_card_in("ARCHER", Team::Blue, None, Zone::Hand).unwrap();
    let effects = state.card(archer).unwrap().effects.clone();
    let (first, second) = (effects[0], effects[1]);

    state
        .apply(&Action::PlayRequest {
            team: Team::Blue,
            hand_index: 0,
        })
        .unwrap();
    assert_eq!(state.phase, Phase::Targeting);
    assert_eq!(state.targeting.len(), 2);
    assert_eq!(state.targeting.top().map(|p| p.effect), Some(second));

    state.apply(&Action::targets(Team::Blue, &[left])).unwrap();
    assert_eq!(state.phase, Phase::Targeting);
    assert_eq!(state.effects.get(second).unwrap().targets.as_slice(), &[left]);
    assert_eq!(state.targeting.top().map(|p| p.effect), Some(first));

    state.apply(&Action::targets(Team::Blue, &[right])).unwrap();
    assert_eq!(state.phase, Phase::Idle);
    drain(&mut state);

    assert_eq!(state.card(archer).unwrap().zone, Zone::Camp);
    assert_eq!(state.card(left).unwrap().health(), 1);
    assert_eq!(state.card(right).unwrap().health(), 2);
    assert_eq!(state.players[Team::Blue].mana.common, 4);
}

/// Test that invalid targets are rejected without touching the request.
#[test]
fn test_invalid_targets_rejected() {
    let mut state = state();
    let grunt = state.create_card_in("GRUNT", Team::Red, None, Zone::Camp).unwrap();
    state.create_card_in("ARCHER", Team::Blue, None, Zone::Hand).unwrap();
    state
        .apply(&Action::PlayRequest {
            team: Team::Blue,
            hand_index: 0,
        })
        .unwrap();

    let nexus = EntityId::nexus(Team::Red);
    assert!(matches!(
        state.validate(&Action::targets(Team::Blue, &[nexus])),
        Err(InvalidAction::InvalidTargets { .. })
    ));
    assert!(matches!(
        state.validate(&Action::targets(Team::Blue, &[grunt, grunt])),
        Err(InvalidAction::InvalidTargets { .. })
    ));
    assert_eq!(state.targeting.len(), 2);
}

/// Test cancelling while targeting returns the card and spends nothing.
#[test]
fn test_cancel_during_targeting() {
    let mut state = state();
    state.create_card_in("GRUNT", Team::Red, None, Zone::Camp).unwrap();
    let archer = state.create_card_in("ARCHER", Team::Blue, None, Zone::Hand).unwrap();
    state
        .apply(&Action::PlayRequest {
            team: Team::Blue,
            hand_index: 0,
        })
        .unwrap();

    state.apply(&Action::Cancel { team: Team::Blue }).unwrap();

    assert_eq!(state.phase, Phase::Idle);
    assert!(state.targeting.is_empty());
    assert!(state.action_buffer.is_empty());
    assert_eq!(state.card(archer).unwrap().zone, Zone::Hand);
    assert_eq!(state.players[Team::Blue].mana.common, 6);
    assert!(!state.events().any(|e| e.kind() == EventKind::Play));
}

/// Test slow spells are refused once the stack holds a spell.
#[test]
fn test_spell_speed_gating() {
    let mut state = state();
    state.create_card_in("FAST", Team::Blue, None, Zone::Hand).unwrap();
    state.create_card_in("SLOW", Team::Red, None, Zone::Hand).unwrap();
    state.create_card_in("FAST", Team::Red, None, Zone::Hand).unwrap();

    state
        .apply(&Action::PlaceSpell {
            team: Team::Blue,
            index: 0,
            to_stack: true,
        })
        .unwrap();
    assert!(state.apply(&Action::Accept { team: Team::Blue }).unwrap());

    assert!(matches!(
        state.validate(&Action::PlaceSpell {
            team: Team::Red,
            index: 0,
            to_stack: true,
        }),
        Err(InvalidAction::WrongSpellSpeed { .. })
    ));
    state
        .apply(&Action::PlaceSpell {
            team: Team::Red,
            index: 1,
            to_stack: true,
        })
        .unwrap();
    assert_eq!(state.spell_stack.len(), 2);

    // Red commits, Blue resolves the whole shared stack newest first.
    state.apply(&Action::Accept { team: Team::Red }).unwrap();
    state.apply(&Action::Accept { team: Team::Blue }).unwrap();
    let casts: Vec<Team> = state
        .events()
        .filter_map(|e| match e {
            Event::Cast { team, .. } => Some(*team),
            _ => None,
        })
        .collect();
    assert_eq!(casts, vec![Team::Red, Team::Blue]);
    assert_eq!(state.players[Team::Blue].mana.common, 5);
    assert_eq!(state.players[Team::Red].mana.common, 5);
}

/// Test that placed spells reserve mana until they are cast.
#[test]
fn test_spell_reservation() {
    let mut state = state();
    state.players[Team::Blue].mana.common = 1;
    state.create_card_in("FAST", Team::Blue, None, Zone::Hand).unwrap();
    state.create_card_in("FAST", Team::Blue, None, Zone::Hand).unwrap();

    state
        .apply(&Action::PlaceSpell {
            team: Team::Blue,
            index: 0,
            to_stack: true,
        })
        .unwrap();
    assert!(matches!(
        state.validate(&Action::PlaceSpell {
            team: Team::Blue,
            index: 0,
            to_stack: true,
        }),
        Err(InvalidAction::NotEnoughMana { cost: 1, available: 0 })
    ));

    state
        .apply(&Action::PlaceSpell {
            team: Team::Blue,
            index: 0,
            to_stack: false,
        })
        .unwrap();
    assert_eq!(state.boards[Team::Blue].hand.len(), 2);
    assert_eq!(state.available_mana(Team::Blue, true), 1);
}

/// Test dragging an enemy into a challenger's lane.
#[test]
fn test_challenger_drags_enemy() {
    let mut state = state();
    state.players[Team::Blue].flags.attack_token = true;
    state.create_card_in("DUELIST", Team::Blue, None, Zone::Camp).unwrap();
    state.create_card_in("GRUNT", Team::Blue, None, Zone::Camp).unwrap();
    let victim = state.create_card_in("GRUNT", Team::Red, None, Zone::Camp).unwrap();

    state.apply(&Action::attack(Team::Blue, &[1])).unwrap();
    assert!(matches!(
        state.validate(&Action::DragEnemy {
            team: Team::Blue,
            lane: 0,
            camp_index: 0
        }),
        Err(InvalidAction::NoChallenger { lane: 0 })
    ));

    state.apply(&Action::attack(Team::Blue, &[0])).unwrap();
    state
        .apply(&Action::DragEnemy {
            team: Team::Blue,
            lane: 1,
            camp_index: 0,
        })
        .unwrap();
    assert_eq!(state.boards[Team::Red].lane(1), Some(victim));

    state.apply(&Action::Accept { team: Team::Blue }).unwrap();
    state.apply(&Action::Accept { team: Team::Red }).unwrap();

    // Duelist 3/2 kills the 2/3 grunt and dies to it.
    assert_eq!(state.card(victim).unwrap().zone, Zone::Graveyard);
    assert_eq!(state.players[Team::Red].nexus.health, 18);
    assert!(state.verify_zones().is_ok());
}

/// Test that action and config survive a JSON round trip.
#[test]
fn test_serde_round_trip() {
    let action = Action::block(Team::Red, &[(0, 2), (1, 0)]);
    let json = serde_json::to_string(&action).unwrap();
    let back: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(back, action);

    let config: Config = serde_json::from_str(r#"{"camp_size": 4}"#).unwrap();
    assert_eq!(config.camp_size, 4);
    assert_eq!(config.battlefield_size, Config::default().battlefield_size);
}

fn random_game(seed: u64) -> Game {
    let decks = TeamMap::with_value(DeckList::copies(&["GRUNT", "ARCHER", "DUELIST", "SLOW", "FAST"], 3));
    Game::random(Config::default(), catalogue(), &decks, seed).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Zones stay consistent and camps never overflow between actions.
    #[test]
    fn prop_zone_and_camp_invariants(seed in 0u64..10_000) {
        let mut game = random_game(seed);
        let config = game.state.config.clone();
        for _ in 0..3_000 {
            if game.state.status.is_over() {
                break;
            }
            game.step().unwrap();
            prop_assert!(game.state.verify_zones().is_ok(), "{:?}", game.state.verify_zones());
            for team in Team::ALL {
                let board = &game.state.boards[team];
                prop_assert!(board.camp.len() <= config.camp_size);
                prop_assert!(
                    board.camp.len() + board.battlefield_units().count()
                        <= config.camp_size + config.battlefield_size
                );
                prop_assert!(game.state.players[team].mana.common >= 0);
                prop_assert!(game.state.players[team].mana.floating >= 0);
            }
        }
    }
}
