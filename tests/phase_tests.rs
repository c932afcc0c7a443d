//! Phase machine integration tests.

use rust_board::board::Board;
use rust_board::core::{GamePhase, GameSettings, GameState, Player, PlayerId, TurnPhase};
use rust_board::games::TroubleGame;
use rust_board::rules::{EngineEvent, PhaseContext, PhaseDriven, PhaseStateMachine, RulesEngine};

/// A minimal engine counting handler runs.
struct Counter {
    state: GameState,
    phases: PhaseStateMachine<Counter>,
    turns: u32,
    seen: Vec<PhaseContext>,
}

impl PhaseDriven for Counter {
    fn phases(&self) -> &PhaseStateMachine<Self> {
        &self.phases
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

fn counter() -> Counter {
    let mut phases = PhaseStateMachine::new();
    phases
        .on_game_phase(GamePhase::InGame, |c: &mut Counter, ctx| {
            c.seen.push(*ctx);
            if ctx.previous_game_phase != GamePhase::Paused {
                c.transition_turn_phase(TurnPhase::BeginTurn);
            }
        })
        .on_turn_phase(TurnPhase::BeginTurn, |c: &mut Counter, ctx| {
            c.seen.push(*ctx);
            c.turns += 1;
            c.transition_turn_phase(TurnPhase::WaitingForMove);
        })
        .on_turn_phase(TurnPhase::EndTurn, |c: &mut Counter, _| {
            if c.turns < 3 {
                c.transition_turn_phase(TurnPhase::BeginTurn);
            } else {
                c.transition_game_phase(GamePhase::GameEnded);
            }
        });

    Counter {
        state: GameState::new(Board::new("counter"), GameSettings::default()),
        phases,
        turns: 0,
        seen: Vec::new(),
    }
}

#[test]
fn test_handlers_see_previous_phases() {
    let mut c = counter();
    c.transition_game_phase(GamePhase::InGame);

    assert_eq!(c.turns, 1);
    assert_eq!(c.state.turn_phase, TurnPhase::WaitingForMove);
    assert_eq!(c.seen[0].previous_game_phase, GamePhase::InLobby);
    assert_eq!(c.seen[1].previous_game_phase, GamePhase::InGame);
    assert_eq!(c.seen[1].previous_turn_phase, TurnPhase::BeginTurn);
}

#[test]
fn test_resume_does_not_restart_turn() {
    let mut c = counter();
    c.transition_game_phase(GamePhase::InGame);
    c.transition_game_phase(GamePhase::Paused);
    c.transition_game_phase(GamePhase::InGame);

    assert_eq!(c.turns, 1);
    assert_eq!(c.state.turn_phase, TurnPhase::WaitingForMove);
}

#[test]
fn test_ended_game_ignores_transitions() {
    let mut c = counter();
    c.transition_game_phase(GamePhase::InGame);
    for _ in 0..3 {
        c.transition_turn_phase(TurnPhase::EndTurn);
    }
    assert_eq!(c.state.game_phase, GamePhase::GameEnded);

    c.transition_turn_phase(TurnPhase::BeginTurn);
    c.transition_game_phase(GamePhase::InGame);
    assert_eq!(c.turns, 3);
    assert_eq!(c.state.game_phase, GamePhase::GameEnded);

    c.transition_game_phase(GamePhase::InLobby);
    assert_eq!(c.state.game_phase, GamePhase::InLobby);
}

#[test]
fn test_engine_reports_phase_changes() {
    let mut game = TroubleGame::new(2);
    game.join(Player::new("a", "a", "a")).unwrap();
    game.join(Player::new("b", "b", "b")).unwrap();
    game.start().unwrap();

    let events = game.take_events();
    assert_eq!(
        events[0],
        EngineEvent::GamePhaseChanged {
            from: GamePhase::InLobby,
            to: GamePhase::InGame,
        }
    );
    let turn_phases: Vec<TurnPhase> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::TurnPhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(turn_phases, vec![TurnPhase::BeginTurn, TurnPhase::WaitingForMove]);
    assert!(events.contains(&EngineEvent::TurnStarted {
        player: PlayerId::new("a"),
        turn: 1,
    }));
}
