//! Path engine integration tests against boards loaded from JSON.

use serde_json::json;

use rust_board::actions::kinds::{MOVE_STEPS, SET_STAT};
use rust_board::board::{Board, RuleSpec, Space, TriggerRecord};
use rust_board::core::{EngineError, GamePhase, Intent, IntentKind, Player, PlayerId, SpaceId, TurnPhase};
use rust_board::games::PathGame;
use rust_board::rules::{EngineEvent, GameResult, PhaseDriven, RulesEngine};
use rust_board::triggers::kinds::{ON_ENTER, ROLL_EQUALS};

const GARDEN: &str = r#"{
    "name": "garden",
    "startSpace": "gate",
    "settings": { "dieSides": 4, "specialRolls": [] },
    "spaces": [
        { "id": "gate", "connections": [{ "target": "path" }] },
        {
            "id": "path",
            "connections": [{ "target": "pond" }],
            "triggers": [
                { "when": { "type": "ON_PASS" },
                  "action": { "type": "MODIFY_STAT", "payload": { "stat": "steps", "delta": 1 } } }
            ]
        },
        {
            "id": "pond",
            "connections": [{ "target": "bridge" }],
            "triggers": [
                { "when": { "type": "ON_ENTER" },
                  "action": { "type": "MOVE_TO", "payload": { "space": "gate" } } },
                { "when": { "type": "ON_ENTER" },
                  "action": { "type": "DISPLAY_PROMPT", "payload": { "message": "You fell in the pond" } },
                  "priority": 2 }
            ]
        },
        {
            "id": "bridge",
            "connections": [{ "target": "tower" }],
            "triggers": [
                { "when": { "type": "ON_ENTER" }, "action": { "type": "EXTRA_TURN" } }
            ]
        },
        { "id": "tower", "finish": true }
    ]
}"#;

fn garden() -> PathGame {
    let board = Board::from_json(GARDEN).unwrap();
    let mut game = PathGame::new(board, 8);
    game.join(Player::new("a", "peer-a", "Ann")).unwrap();
    game.join(Player::new("b", "peer-b", "Bo")).unwrap();
    game.start().unwrap();
    game.take_events();
    game
}

fn roll(value: u32) -> Intent {
    Intent::new(IntentKind::RollDice).with_data(json!({ "value": value }))
}

fn a() -> PlayerId {
    PlayerId::new("a")
}

fn b() -> PlayerId {
    PlayerId::new("b")
}

fn position(game: &PathGame, seat: usize) -> Option<&str> {
    game.state().players[seat].position.as_ref().map(SpaceId::as_str)
}

fn pending_ticket(events: &[EngineEvent]) -> Option<u64> {
    events.iter().find_map(|e| match e {
        EngineEvent::PromptShown { ticket, .. } => Some(*ticket),
        _ => None,
    })
}

#[test]
fn test_board_settings_override_session() {
    let mut game = garden();
    assert_eq!(game.state().settings.die_sides, 4);
    assert_eq!(position(&game, 0), Some("gate"));

    assert_eq!(game.submit(&a(), &roll(5)), Err(EngineError::InvalidRoll(5)));
    assert_eq!(game.state().turn_phase, TurnPhase::Rolling);
}

#[test]
fn test_prompt_then_teleport() {
    let mut game = garden();

    game.submit(&a(), &roll(2)).unwrap();
    assert_eq!(position(&game, 0), Some("pond"));
    assert_eq!(game.state().players[0].stat("steps", 0), 1);
    assert!(game.has_pending_action());

    let ticket = pending_ticket(&game.take_events()).unwrap();
    let before = game.state().to_snapshot().unwrap();
    let wrong = Intent::new(IntentKind::AcknowledgePrompt).with_data(json!({ "ticket": ticket + 7 }));
    assert_eq!(game.submit(&a(), &wrong), Err(EngineError::UnknownTicket(ticket + 7)));
    assert_eq!(game.state().to_snapshot().unwrap(), before);

    let ack = Intent::new(IntentKind::AcknowledgePrompt).with_data(json!({ "ticket": ticket }));
    game.submit(&a(), &ack).unwrap();

    // MOVE_TO teleports without firing the gate's triggers.
    assert_eq!(position(&game, 0), Some("gate"));
    assert!(game.take_events().contains(&EngineEvent::PlayerMoved {
        player: a(),
        from: Some(SpaceId::new("pond")),
        to: SpaceId::new("gate"),
    }));
    assert_eq!(game.state().current_player_id(), Some(&b()));
    assert_eq!(game.state().turn_phase, TurnPhase::Rolling);
}

#[test]
fn test_extra_turn_then_win() {
    let mut game = garden();
    game.submit(&a(), &roll(1)).unwrap();

    game.submit(&b(), &roll(3)).unwrap();
    assert_eq!(position(&game, 1), Some("bridge"));
    assert_eq!(game.state().current_player_id(), Some(&b()));
    assert_eq!(game.state().players[1].stat("steps", 0), 1);

    game.submit(&b(), &roll(1)).unwrap();
    assert_eq!(game.state().game_phase, GamePhase::GameEnded);
    assert_eq!(game.is_terminal(), Some(GameResult::Winner(b())));
    assert!(game.legal_intents().is_empty());
}

#[test]
fn test_overshoot_passes_turn() {
    let mut game = garden();
    game.submit(&a(), &roll(1)).unwrap();
    game.submit(&b(), &roll(1)).unwrap();

    // path -> pond -> bridge -> tower is three steps; four goes nowhere.
    game.submit(&a(), &roll(4)).unwrap();
    assert_eq!(position(&game, 0), Some("path"));
    assert_eq!(game.state().current_player_id(), Some(&b()));
}

#[test]
fn test_move_steps_and_roll_trigger() {
    let board = Board::new("slide")
        .with_start("s0")
        .with_space(Space::new("s0").connect("s1"))
        .with_space(Space::new("s1").connect("s2").with_trigger(TriggerRecord::new(
            RuleSpec::new(ON_ENTER),
            RuleSpec::new(MOVE_STEPS).with_payload(json!({ "steps": 2 })),
        )))
        .with_space(Space::new("s2").connect("s3").with_trigger(TriggerRecord::new(
            RuleSpec::new(ROLL_EQUALS).with_payload(json!({ "value": 2 })),
            RuleSpec::new(SET_STAT).with_payload(json!({ "stat": "lucky", "value": 1 })),
        )))
        .with_space(Space::new("s3").connect("s4"))
        .with_space(Space::new("s4").as_finish());
    let mut game = PathGame::new(board, 1);
    game.join(Player::new("a", "a", "a")).unwrap();
    game.join(Player::new("b", "b", "b")).unwrap();
    game.start().unwrap();

    game.submit(&a(), &roll(1)).unwrap();
    assert_eq!(position(&game, 0), Some("s3"), "slid two spaces from s1");

    game.submit(&b(), &roll(2)).unwrap();
    assert_eq!(position(&game, 1), Some("s2"));
    assert_eq!(game.state().players[1].stat("lucky", 0), 1);
}

#[test]
fn test_no_token_cannot_roll() {
    let board = Board::new("unplaced").with_space(Space::new("x").connect("y")).with_space(Space::new("y"));
    let mut game = PathGame::new(board, 1);
    game.join(Player::new("a", "a", "a")).unwrap();
    game.join(Player::new("b", "b", "b")).unwrap();
    game.start().unwrap();

    assert!(matches!(game.submit(&a(), &roll(1)), Err(EngineError::InvalidOption(_))));
    assert_eq!(game.state().last_roll, None);
}

#[test]
fn test_load_board_restarts_in_lobby() {
    let mut game = garden();
    game.submit(&a(), &roll(1)).unwrap();

    game.load_board(Board::from_json(GARDEN).unwrap());
    assert_eq!(game.state().game_phase, GamePhase::InLobby);
    assert_eq!(game.state().player_count(), 2);
    assert_eq!(position(&game, 0), Some("gate"));
    assert!(matches!(game.submit(&a(), &roll(1)), Err(EngineError::GameNotRunning(GamePhase::InLobby))));
}
