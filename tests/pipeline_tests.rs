//! Trigger→action pipeline integration tests.
//!
//! These tests drive the `EventProcessor` directly against a board whose
//! spaces carry trigger records, the way a loaded board JSON would.

use serde_json::{json, Value};

use rust_board::actions::kinds::{DISPLAY_PROMPT, MODIFY_STAT, SET_STAT};
use rust_board::board::{Board, RuleSpec, Space, TriggerRecord};
use rust_board::core::{ConfigError, EngineError, GameSettings, GameState, Player, PlayerId, SpaceId};
use rust_board::pipeline::{EventProcessor, ResolutionStatus};
use rust_board::rules::{EngineEvent, Registries};
use rust_board::triggers::kinds::{ON_ENTER, ON_EXIT, ON_PASS, STAT_AT_LEAST};
use rust_board::triggers::{SpaceEvent, SpaceEventKind, Trigger, TriggerContext};

fn record(when: &str, action: &str, payload: Value) -> TriggerRecord {
    TriggerRecord::new(RuleSpec::new(when), RuleSpec::new(action).with_payload(payload))
}

fn state_with(spaces: Vec<Space>) -> GameState {
    let mut board = Board::new("pipeline");
    for space in spaces {
        board = board.with_space(space);
    }
    let mut state = GameState::new(board, GameSettings::default());
    state.players.push(Player::new("a", "peer-a", "Ann"));
    state
}

fn enter(space: &str) -> Vec<SpaceEvent> {
    vec![SpaceEvent::new(SpaceEventKind::Entered, SpaceId::new(space), PlayerId::new("a"))]
}

fn stat_events(events: &[EngineEvent]) -> Vec<(String, i64)> {
    events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::StatChanged { stat, value, .. } => Some((stat.clone(), *value)),
            _ => None,
        })
        .collect()
}

fn stat(state: &GameState, key: &str) -> i64 {
    state.player(&PlayerId::new("a")).map_or(0, |p| p.stat(key, 0))
}

/// Higher priority runs first; equal priorities keep declaration order.
#[test]
fn test_priority_order_is_stable() {
    let space = Space::new("s")
        .with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "x", "value": 1})).with_priority(1))
        .with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "x", "value": 5})).with_priority(5))
        .with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "x", "value": 2})).with_priority(1));
    let mut state = state_with(vec![space]);
    let registries = Registries::with_builtins();
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    processor.enqueue(enter("s"));
    let status = processor.resolve(&mut state, &registries, &mut out);

    assert_eq!(status, ResolutionStatus::Complete);
    let values: Vec<i64> = stat_events(&out).into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, vec![5, 1, 2]);
    assert_eq!(stat(&state, "x"), 2);
}

/// A trigger sees the effects of actions that ran before it.
#[test]
fn test_triggers_evaluated_lazily() {
    let space = Space::new("s")
        .with_trigger(record(ON_ENTER, MODIFY_STAT, json!({"stat": "coins", "delta": 3})))
        .with_trigger(TriggerRecord::new(
            RuleSpec::new(STAT_AT_LEAST).with_payload(json!({"stat": "coins", "value": 3})),
            RuleSpec::new(SET_STAT).with_payload(json!({"stat": "rich", "value": 1})),
        ));
    let mut state = state_with(vec![space]);
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    processor.enqueue(enter("s"));
    processor.resolve(&mut state, &Registries::with_builtins(), &mut out);

    assert_eq!(stat(&state, "coins"), 3);
    assert_eq!(stat(&state, "rich"), 1);
}

/// Unknown trigger and action types are skipped; the rest still runs.
#[test]
fn test_unknown_types_skipped() {
    let space = Space::new("s")
        .with_trigger(record("TELEPORTER", SET_STAT, json!({"stat": "x", "value": 9})))
        .with_trigger(record(ON_ENTER, "FLY", json!({})))
        .with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "x"})))
        .with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "x", "value": 4})));
    let mut state = state_with(vec![space]);
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    processor.enqueue(enter("s"));
    let status = processor.resolve(&mut state, &Registries::with_builtins(), &mut out);

    assert!(status.is_complete());
    assert_eq!(stat(&state, "x"), 4);
    assert_eq!(stat_events(&out).len(), 1);
}

/// Exit, then each passed space in path order, then enter.
#[test]
fn test_move_event_order() {
    let spaces = vec![
        Space::new("a").with_trigger(record(ON_EXIT, MODIFY_STAT, json!({"stat": "exit", "delta": 1}))),
        Space::new("b").with_trigger(record(ON_PASS, MODIFY_STAT, json!({"stat": "pass-b", "delta": 1}))),
        Space::new("c")
            .with_trigger(record(ON_PASS, MODIFY_STAT, json!({"stat": "pass-c", "delta": 1})))
            .with_trigger(record(ON_ENTER, MODIFY_STAT, json!({"stat": "never", "delta": 1}))),
        Space::new("d").with_trigger(record(ON_ENTER, MODIFY_STAT, json!({"stat": "enter", "delta": 1}))),
    ];
    let mut state = state_with(spaces);
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    let passed = [SpaceId::new("b"), SpaceId::new("c")];
    processor.enqueue(SpaceEvent::for_move(
        &PlayerId::new("a"),
        Some(&SpaceId::new("a")),
        &passed,
        &SpaceId::new("d"),
    ));
    processor.resolve(&mut state, &Registries::with_builtins(), &mut out);

    let names: Vec<String> = stat_events(&out).into_iter().map(|(s, _)| s).collect();
    assert_eq!(names, vec!["exit", "pass-b", "pass-c", "enter"]);
}

/// A prompt parks the pipeline until its ticket is acknowledged, once.
#[test]
fn test_suspension_and_resume() {
    let space = Space::new("s")
        .with_trigger(record(ON_ENTER, DISPLAY_PROMPT, json!({"message": "Pay the toll"})).with_priority(1))
        .with_trigger(record(ON_ENTER, MODIFY_STAT, json!({"stat": "coins", "delta": -2})));
    let mut state = state_with(vec![space]);
    let registries = Registries::with_builtins();
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    processor.enqueue(enter("s"));
    let ticket = match processor.resolve(&mut state, &registries, &mut out) {
        ResolutionStatus::Suspended(pending) => {
            assert_eq!(pending.prompt.message, "Pay the toll");
            assert_eq!(pending.player, PlayerId::new("a"));
            pending.ticket
        }
        other => panic!("expected suspension, got {:?}", other),
    };
    assert_eq!(stat(&state, "coins"), 0, "later actions wait for the prompt");
    assert!(!processor.is_idle());

    // Resolving again does not run anything new.
    assert!(!processor.resolve(&mut state, &registries, &mut out).is_complete());
    assert_eq!(stat(&state, "coins"), 0);

    assert_eq!(
        processor.acknowledge(ticket + 1, &mut state, &registries, &mut out),
        Err(EngineError::UnknownTicket(ticket + 1))
    );
    assert_eq!(
        processor.acknowledge(ticket, &mut state, &registries, &mut out),
        Ok(ResolutionStatus::Complete)
    );
    assert_eq!(stat(&state, "coins"), -2);
    assert!(processor.is_idle());

    assert_eq!(
        processor.acknowledge(ticket, &mut state, &registries, &mut out),
        Err(EngineError::NoPendingAction)
    );
}

/// Events queued behind a suspension are processed after it resumes.
#[test]
fn test_queue_survives_suspension() {
    let spaces = vec![
        Space::new("a").with_trigger(record(ON_ENTER, DISPLAY_PROMPT, json!({"message": "first"}))),
        Space::new("b").with_trigger(record(ON_ENTER, SET_STAT, json!({"stat": "b", "value": 1}))),
    ];
    let mut state = state_with(spaces);
    let registries = Registries::with_builtins();
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    processor.enqueue(enter("a"));
    processor.enqueue(enter("b"));
    let ResolutionStatus::Suspended(pending) = processor.resolve(&mut state, &registries, &mut out) else {
        panic!("expected suspension");
    };
    assert_eq!(stat(&state, "b"), 0);

    processor.acknowledge(pending.ticket, &mut state, &registries, &mut out).unwrap();
    assert_eq!(stat(&state, "b"), 1);
}

/// A plugin trigger type registered after the board was built.
struct OddRoll;

impl Trigger for OddRoll {
    fn listens_for(&self) -> SpaceEventKind {
        SpaceEventKind::Entered
    }

    fn is_triggered(&self, ctx: &TriggerContext<'_>) -> bool {
        ctx.state.last_roll.is_some_and(|r| r % 2 == 1)
    }
}

fn odd_roll(_: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    Ok(Box::new(OddRoll))
}

#[test]
fn test_plugin_trigger() {
    let space = Space::new("s").with_trigger(record("ODD_ROLL", SET_STAT, json!({"stat": "odd", "value": 1})));
    let mut state = state_with(vec![space]);
    let mut registries = Registries::with_builtins();
    let mut processor = EventProcessor::new();
    let mut out = Vec::new();

    state.last_roll = Some(3);
    processor.enqueue(enter("s"));
    processor.resolve(&mut state, &registries, &mut out);
    assert_eq!(stat(&state, "odd"), 0, "unregistered type is skipped");

    registries.triggers.register("ODD_ROLL", odd_roll);
    processor.enqueue(enter("s"));
    processor.resolve(&mut state, &registries, &mut out);
    assert_eq!(stat(&state, "odd"), 1);
}
