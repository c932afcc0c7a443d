//! Host session: the single writer of the canonical state.
//!
//! `HostSession` wraps a rules engine and is the only path by which peers
//! change the game. Everything is driven from the caller's loop:
//!
//! - `handle` authorizes and applies one intent, then schedules a snapshot
//! - `drain_due` releases scheduled snapshots in sequence order
//! - `tick` runs the turn timer
//!
//! A rejected intent leaves the state untouched and schedules nothing.
//! Snapshots are scheduled `move_delay_ms` after the mutation but are never
//! released ahead of an earlier one.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::message::{HostMessage, IntentMessage, IntentResult};
use crate::board::Board;
use crate::core::{EngineError, GamePhase, GameState, Intent, IntentKind, IntentRecord, Player, PlayerId};
use crate::rules::RulesEngine;

/// A snapshot waiting for its release time.
#[derive(Clone, Debug, PartialEq)]
pub struct Broadcast {
    pub seq: u64,
    pub deliver_at_ms: u64,
    pub message: HostMessage,
}

/// Whose turn the timer is running for.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TurnTimer {
    turn: u32,
    player: PlayerId,
    deadline_ms: u64,
}

/// Host-side session around a rules engine.
#[derive(Debug)]
pub struct HostSession<E: RulesEngine> {
    engine: E,
    seq: u64,
    outbox: VecDeque<Broadcast>,
    timer: Option<TurnTimer>,
}

impl<E: RulesEngine> HostSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            seq: 0,
            outbox: VecDeque::new(),
            timer: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access, for plugins registering types.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// Sequence number of the last scheduled broadcast.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Broadcasts not yet released.
    #[must_use]
    pub fn pending_broadcasts(&self) -> usize {
        self.outbox.len()
    }

    // === Intents ===

    /// Authorize and apply a client message.
    pub fn handle(&mut self, message: &IntentMessage, now_ms: u64) -> IntentResult {
        let intent = message.intent();
        match self.apply(&message.player_id, intent, now_ms) {
            Ok(()) => IntentResult::ok(),
            Err(err) => {
                warn!(player = %message.player_id, action = %message.action_type, error = %err, "intent rejected");
                IntentResult::rejected(&err)
            }
        }
    }

    /// Parse and handle a raw JSON message.
    pub fn handle_json(&mut self, json: &str, now_ms: u64) -> IntentResult {
        match IntentMessage::from_json(json) {
            Ok(message) => self.handle(&message, now_ms),
            Err(err) => {
                warn!(error = %err, "malformed intent message");
                IntentResult::rejected(&err)
            }
        }
    }

    fn apply(&mut self, player: &PlayerId, intent: Intent, now_ms: u64) -> Result<(), EngineError> {
        let turn = self.engine.state().turn_number;
        self.engine.submit(player, &intent)?;

        let sequence = self.seq + 1;
        debug!(player = %player, intent = %intent.kind, sequence, "intent accepted");
        self.engine.state_mut().record_intent(IntentRecord {
            player: player.clone(),
            intent,
            turn,
            sequence,
        });
        self.schedule(now_ms);
        Ok(())
    }

    // === Broadcasts ===

    fn schedule(&mut self, now_ms: u64) {
        self.seq += 1;
        let delay = self.engine.state().settings.move_delay_ms;
        let earliest = self.outbox.back().map_or(0, |b| b.deliver_at_ms);
        let deliver_at_ms = (now_ms + delay).max(earliest);

        let message = HostMessage::Snapshot {
            seq: self.seq,
            state: self.engine.state().clone(),
            events: self.engine.take_events(),
        };
        self.outbox.push_back(Broadcast {
            seq: self.seq,
            deliver_at_ms,
            message,
        });
    }

    /// Release every broadcast due by `now_ms`, oldest first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<Broadcast> {
        let mut due = Vec::new();
        while self.outbox.front().is_some_and(|b| b.deliver_at_ms <= now_ms) {
            if let Some(broadcast) = self.outbox.pop_front() {
                due.push(broadcast);
            }
        }
        due
    }

    // === Turn timer ===

    /// Advance the turn timer. When the current player's time runs out,
    /// a `skip-turn` is submitted on their behalf.
    ///
    /// Returns whether a skip was applied.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let state = self.engine.state();
        let Some(secs) = state.settings.turn_timer_secs else {
            self.timer = None;
            return false;
        };
        if state.game_phase != GamePhase::InGame {
            self.timer = None;
            return false;
        }
        let Some(player) = state.current_player_id().cloned() else {
            return false;
        };

        let turn = state.turn_number;
        let stale = self
            .timer
            .as_ref()
            .map_or(true, |t| t.turn != turn || t.player != player);
        if stale {
            self.timer = Some(TurnTimer {
                turn,
                player,
                deadline_ms: now_ms + u64::from(secs) * 1000,
            });
            return false;
        }
        if self.timer.as_ref().is_some_and(|t| now_ms < t.deadline_ms) {
            return false;
        }

        info!(player = %player, turn, "turn timer expired");
        match self.apply(&player, Intent::new(IntentKind::SkipTurn), now_ms) {
            Ok(()) => {
                self.timer = None;
                true
            }
            Err(err) => {
                debug!(player = %player, error = %err, "timed skip refused; retrying next tick");
                false
            }
        }
    }

    // === Lobby and admin ===

    pub fn join(&mut self, player: Player, now_ms: u64) -> Result<(), EngineError> {
        self.engine.join(player)?;
        self.schedule(now_ms);
        Ok(())
    }

    pub fn leave(&mut self, player: &PlayerId, now_ms: u64) -> Result<(), EngineError> {
        self.engine.leave(player)?;
        self.schedule(now_ms);
        Ok(())
    }

    pub fn start(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.engine.start()?;
        self.schedule(now_ms);
        Ok(())
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.engine.pause()?;
        self.schedule(now_ms);
        Ok(())
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.engine.resume()?;
        self.schedule(now_ms);
        Ok(())
    }

    /// Load a new board; players persist, everything else restarts in the
    /// lobby.
    pub fn load_board(&mut self, board: Board, now_ms: u64) {
        self.engine.load_board(board);
        self.timer = None;
        self.schedule(now_ms);
    }

    pub fn return_to_lobby(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.engine.return_to_lobby()?;
        self.timer = None;
        self.schedule(now_ms);
        Ok(())
    }
}
