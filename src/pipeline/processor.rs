//! Event processor state machine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actions::{ActionContext, ActionStatus, Prompt};
use crate::board::TriggerRecord;
use crate::core::{EngineError, GameState, PlayerId, SpaceId};
use crate::rules::{EngineEvent, Registries};
use crate::triggers::{SpaceEvent, TriggerContext};

/// An action waiting for its player's acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub ticket: u64,
    pub player: PlayerId,
    pub space: SpaceId,
    pub prompt: Prompt,
}

/// Outcome of a resolution pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// Every queued event has been fully processed.
    Complete,
    /// Stopped on an action awaiting acknowledgement.
    Suspended(PendingAction),
}

impl ResolutionStatus {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, ResolutionStatus::Complete)
    }
}

/// The event being worked through and the records it has left.
#[derive(Clone, Debug)]
struct ActiveEvent {
    event: SpaceEvent,
    records: VecDeque<TriggerRecord>,
}

/// Runs board triggers for queued movement events.
#[derive(Clone, Debug)]
pub struct EventProcessor {
    queue: VecDeque<SpaceEvent>,
    active: Option<ActiveEvent>,
    pending: Option<PendingAction>,
    next_ticket: u64,
}

impl Default for EventProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            active: None,
            pending: None,
            next_ticket: 1,
        }
    }

    /// Queue events behind anything already waiting.
    pub fn enqueue(&mut self, events: impl IntoIterator<Item = SpaceEvent>) {
        self.queue.extend(events);
    }

    /// The action awaiting acknowledgement, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// No pending action and nothing left to process.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.active.is_none() && self.queue.is_empty()
    }

    /// Drop all queued work, including a pending action.
    pub fn clear(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(ticket = pending.ticket, "discarding pending action");
        }
        self.queue.clear();
        self.active = None;
    }

    /// Process queued events until done or suspended.
    ///
    /// While an action is pending this does nothing and reports the
    /// suspension again.
    pub fn resolve(
        &mut self,
        state: &mut GameState,
        registries: &Registries,
        out: &mut Vec<EngineEvent>,
    ) -> ResolutionStatus {
        if let Some(pending) = &self.pending {
            return ResolutionStatus::Suspended(pending.clone());
        }

        loop {
            let Some(active) = self.next_active(state) else {
                return ResolutionStatus::Complete;
            };
            let Some(record) = active.records.pop_front() else {
                self.active = None;
                continue;
            };
            let event = active.event.clone();

            if let Some(prompt) = Self::run_record(&record, &event, state, registries, out) {
                let pending = PendingAction {
                    ticket: self.next_ticket,
                    player: event.player.clone(),
                    space: event.space.clone(),
                    prompt,
                };
                self.next_ticket += 1;
                out.push(EngineEvent::PromptShown {
                    ticket: pending.ticket,
                    player: pending.player.clone(),
                    message: pending.prompt.message.clone(),
                });
                debug!(ticket = pending.ticket, player = %pending.player, "pipeline suspended");
                self.pending = Some(pending.clone());
                return ResolutionStatus::Suspended(pending);
            }
        }
    }

    /// Complete the pending action and resume.
    ///
    /// Fails without changing anything when nothing is pending or the
    /// ticket does not match; a ticket resolves exactly once.
    pub fn acknowledge(
        &mut self,
        ticket: u64,
        state: &mut GameState,
        registries: &Registries,
        out: &mut Vec<EngineEvent>,
    ) -> Result<ResolutionStatus, EngineError> {
        let pending = self.pending.as_ref().ok_or(EngineError::NoPendingAction)?;
        if pending.ticket != ticket {
            return Err(EngineError::UnknownTicket(ticket));
        }
        self.pending = None;
        out.push(EngineEvent::PromptAcknowledged { ticket });
        Ok(self.resolve(state, registries, out))
    }

    /// The event in progress, starting the next queued one when needed.
    fn next_active(&mut self, state: &GameState) -> Option<&mut ActiveEvent> {
        if self.active.is_none() {
            let event = self.queue.pop_front()?;
            let records = match state.board.space(&event.space) {
                Some(space) => space.ordered_triggers().into_iter().cloned().collect(),
                None => {
                    debug!(space = %event.space, "event on a space the board does not define");
                    VecDeque::new()
                }
            };
            self.active = Some(ActiveEvent { event, records });
        }
        self.active.as_mut()
    }

    /// Evaluate one record and run its action if it fires. Returns the
    /// prompt when the action suspends.
    fn run_record(
        record: &TriggerRecord,
        event: &SpaceEvent,
        state: &mut GameState,
        registries: &Registries,
        out: &mut Vec<EngineEvent>,
    ) -> Option<Prompt> {
        let trigger = match registries.triggers.build(&record.when) {
            Ok(trigger) => trigger,
            Err(err) => {
                warn!(space = %event.space, error = %err, "skipping trigger");
                return None;
            }
        };
        if trigger.listens_for() != event.kind {
            return None;
        }

        let fired = {
            let space = state.board.space(&event.space)?;
            trigger.is_triggered(&TriggerContext::new(state, space, &event.player, event))
        };
        if !fired {
            return None;
        }

        let action = match registries.actions.build(&record.action) {
            Ok(action) => action,
            Err(err) => {
                warn!(space = %event.space, error = %err, "skipping action");
                return None;
            }
        };

        debug!(
            space = %event.space,
            trigger = %record.when.kind,
            action = %record.action.kind,
            "trigger fired"
        );
        let mut ctx = ActionContext::new(state, &registries.effects, &event.player, &event.space, out);
        match action.execute(&mut ctx) {
            Ok(ActionStatus::Completed) => None,
            Ok(ActionStatus::AwaitingAcknowledgement(prompt)) => Some(prompt),
            Err(err) => {
                warn!(space = %event.space, action = %record.action.kind, error = %err, "action failed");
                None
            }
        }
    }
}
