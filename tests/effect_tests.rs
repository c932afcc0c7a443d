//! Lingering effect integration tests.
//!
//! Each test plays the path engine on a straight line of twelve spaces
//! where one space attaches an effect to whoever lands on it.

use proptest::prelude::*;
use serde_json::json;

use rust_board::actions::kinds::APPLY_EFFECT;
use rust_board::board::{Board, RuleSpec, Space, TriggerRecord};
use rust_board::core::{GameSettings, GameState, Intent, IntentKind, Player, PlayerId, TurnDirection, TurnPhase};
use rust_board::effects::kinds::{REPEAT_TURNS, REVERSE_DIRECTION, SKIP_TURNS};
use rust_board::effects::{Effect, EffectContext, EffectRecord, EffectRegistry};
use rust_board::games::PathGame;
use rust_board::rules::{EngineEvent, PhaseDriven, RulesEngine};
use rust_board::triggers::kinds::ON_ENTER;

const SPACES: usize = 12;

/// `s0 -> s1 -> ... -> s11`, with `effect` attached on entering `s{at}`.
fn line_with_effect(at: usize, effect: &str, turns: u32) -> Board {
    let mut board = Board::new("effects").with_start("s0");
    for i in 0..SPACES {
        let mut space = Space::new(format!("s{}", i));
        if i + 1 < SPACES {
            space = space.connect(format!("s{}", i + 1));
        } else {
            space = space.as_finish();
        }
        if i == at {
            space = space.with_trigger(TriggerRecord::new(
                RuleSpec::new(ON_ENTER),
                RuleSpec::new(APPLY_EFFECT).with_payload(json!({
                    "type": effect,
                    "args": { "turns": turns },
                })),
            ));
        }
        board = board.with_space(space);
    }
    board
}

fn play(board: Board, players: &[&str]) -> PathGame {
    let mut game = PathGame::new(board, 17);
    for id in players {
        game.join(Player::new(*id, *id, *id)).unwrap();
    }
    game.start().unwrap();
    game.take_events();
    game
}

fn roll(game: &mut PathGame, player: &str, value: u32) {
    game.submit(
        &PlayerId::new(player),
        &Intent::new(IntentKind::RollDice).with_data(json!({ "value": value })),
    )
    .unwrap();
}

fn current(game: &PathGame) -> &str {
    game.state().current_player_id().map_or("", |p| p.as_str())
}

fn skipped(events: &[EngineEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, EngineEvent::TurnSkipped { .. }))
        .count()
}

#[test]
fn test_skip_turns_skips_next_turn() {
    let mut game = play(line_with_effect(1, SKIP_TURNS, 1), &["a", "b", "c"]);

    roll(&mut game, "a", 1);
    assert_eq!(game.state().players[0].effects.len(), 1);
    assert!(game.take_events().contains(&EngineEvent::EffectAttached {
        player: PlayerId::new("a"),
        effect: SKIP_TURNS.into(),
    }));

    roll(&mut game, "b", 3);
    roll(&mut game, "c", 3);

    // a's turn is consumed at turn start; play is back with b.
    assert_eq!(current(&game), "b");
    assert_eq!(game.state().turn_phase, TurnPhase::Rolling);
    let events = game.take_events();
    assert_eq!(skipped(&events), 1);
    assert!(events.contains(&EngineEvent::EffectExpired {
        player: PlayerId::new("a"),
        effect: SKIP_TURNS.into(),
    }));
    assert!(game.state().players[0].effects.is_empty());

    roll(&mut game, "b", 1);
    roll(&mut game, "c", 1);
    assert_eq!(current(&game), "a", "only one turn is lost");
}

#[test]
fn test_repeat_turns_grants_another_turn() {
    let mut game = play(line_with_effect(2, REPEAT_TURNS, 1), &["a", "b", "c"]);

    roll(&mut game, "a", 2);
    assert_eq!(current(&game), "a");
    assert_eq!(game.state().turn_number, 2);

    roll(&mut game, "a", 1);
    assert_eq!(current(&game), "b");
    assert!(game.state().players[0].effects.is_empty());
}

#[test]
fn test_reverse_direction_counts_owner_turns() {
    let mut game = play(line_with_effect(3, REVERSE_DIRECTION, 2), &["a", "b", "c"]);

    roll(&mut game, "a", 3);
    assert_eq!(game.state().direction, TurnDirection::Reverse);
    assert_eq!(current(&game), "c");

    roll(&mut game, "c", 1);
    assert_eq!(current(&game), "b");
    roll(&mut game, "b", 1);
    assert_eq!(current(&game), "a");

    // First full turn of the owner's after the one it was applied in.
    roll(&mut game, "a", 1);
    assert_eq!(game.state().direction, TurnDirection::Reverse);
    assert_eq!(current(&game), "c");
    assert_eq!(game.state().players[0].effects.len(), 1);

    roll(&mut game, "c", 1);
    roll(&mut game, "b", 1);
    assert_eq!(current(&game), "a");

    roll(&mut game, "a", 1);
    assert_eq!(game.state().direction, TurnDirection::Forward);
    assert_eq!(current(&game), "b");
    assert!(game.state().players[0].effects.is_empty());
}

#[test]
fn test_reverse_direction_single_turn() {
    let mut game = play(line_with_effect(3, REVERSE_DIRECTION, 1), &["a", "b", "c"]);

    roll(&mut game, "a", 3);
    assert_eq!(game.state().direction, TurnDirection::Reverse);
    assert_eq!(current(&game), "c", "the handoff out of a's turn runs backwards");
    assert_eq!(game.state().players[0].effects.len(), 1);

    roll(&mut game, "c", 1);
    assert_eq!(current(&game), "b");
    roll(&mut game, "b", 1);
    assert_eq!(current(&game), "a");

    roll(&mut game, "a", 1);
    assert_eq!(game.state().direction, TurnDirection::Forward);
    assert_eq!(current(&game), "b");
    assert!(game.take_events().contains(&EngineEvent::EffectExpired {
        player: PlayerId::new("a"),
        effect: REVERSE_DIRECTION.into(),
    }));
}

#[test]
fn test_skip_request_then_owner_skipped() {
    let mut game = play(line_with_effect(1, SKIP_TURNS, 2), &["a", "b"]);
    roll(&mut game, "a", 1);

    game.submit(&PlayerId::new("b"), &Intent::new(IntentKind::SkipTurn)).unwrap();
    assert_eq!(current(&game), "b", "a's turn was skipped by the effect");
    assert_eq!(game.state().players[0].effects.len(), 1);
}

/// Rebuild `record` from its JSON form, enact it once and return the
/// record written back.
fn enact_through_json(registry: &EffectRegistry, state: &mut GameState, record: &EffectRecord) -> EffectRecord {
    let json = serde_json::to_string(record).unwrap();
    let decoded: EffectRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(&decoded, record);

    let mut effect = registry.build(&decoded).unwrap();
    let mut events = Vec::new();
    effect.enact(&mut EffectContext::new(state, &mut events));
    effect.to_record()
}

fn owner_state() -> GameState {
    let mut state = GameState::new(Board::new("records"), GameSettings::default());
    state.players.push(Player::new("a", "a", "a"));
    state.players.push(Player::new("b", "b", "b"));
    state
}

proptest! {
    /// A countdown record expires on exactly its `turns`-th enact when
    /// rebuilt from JSON between enacts.
    #[test]
    fn prop_record_counts_down_through_json(turns in 1u32..=6, repeat in any::<bool>()) {
        let kind = if repeat { REPEAT_TURNS } else { SKIP_TURNS };
        let registry = EffectRegistry::with_builtins();
        let mut state = owner_state();
        let mut record = EffectRecord::new(kind).with_arg("player", "a").with_arg("turns", turns);

        for n in 1..=turns {
            record = enact_through_json(&registry, &mut state, &record);
            prop_assert_eq!(record.to_remove, n == turns, "after enact {}", n);
            prop_assert_eq!(record.arg("turns"), Some(&json!(turns - n)));
        }
    }

    /// A reverse record applied this turn survives one extra enact.
    #[test]
    fn prop_reverse_record_through_json(turns in 1u32..=6) {
        let registry = EffectRegistry::with_builtins();
        let mut state = owner_state();
        let mut record = EffectRecord::new(REVERSE_DIRECTION)
            .with_arg("player", "a")
            .with_arg("turns", turns);

        let mut effect = registry.build(&record).unwrap();
        let mut events = Vec::new();
        effect.apply(&mut EffectContext::new(&mut state, &mut events));
        record = effect.to_record();

        for n in 0..=turns {
            prop_assert_eq!(state.direction, TurnDirection::Reverse);
            record = enact_through_json(&registry, &mut state, &record);
            prop_assert_eq!(record.to_remove, n == turns, "after enact {}", n);
        }
        prop_assert_eq!(state.direction, TurnDirection::Forward);
    }

    /// The owner loses exactly `turns` turns, and the effect survives a
    /// snapshot round trip at every step.
    #[test]
    fn prop_skip_counter(turns in 1u32..=3) {
        let mut game = play(line_with_effect(1, SKIP_TURNS, turns), &["a", "b"]);
        roll(&mut game, "a", 1);

        let mut lost = 0;
        for _ in 0..turns {
            prop_assert_eq!(current(&game), "b");
            let snapshot = game.state().to_snapshot().unwrap();
            prop_assert_eq!(&GameState::from_snapshot(&snapshot).unwrap(), game.state());

            roll(&mut game, "b", 2);
            lost += skipped(&game.take_events());
        }

        prop_assert_eq!(lost, turns as usize);
        prop_assert!(game.state().players[0].effects.is_empty());

        roll(&mut game, "b", 2);
        prop_assert_eq!(current(&game), "a");
        prop_assert_eq!(game.state().turn_phase, TurnPhase::Rolling);
    }
}
