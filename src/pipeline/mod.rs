//! Trigger → action pipeline.
//!
//! After a move is committed, the engine queues the move's space events and
//! asks the [`EventProcessor`] to resolve them. For each event, the space's
//! trigger records run in priority order (declaration order on ties):
//!
//! 1. build the trigger; skip it unless it listens for this event kind
//! 2. evaluate it against the *current* state, so earlier actions count
//! 3. build and execute the paired action
//!
//! Every record gets its chance; a match never short-circuits the rest.
//! Unknown types and failing actions are logged and skipped.
//!
//! ## Suspension
//!
//! An action that needs the player's acknowledgement parks the processor
//! in a [`PendingAction`]. Resolution stops there and reports
//! [`ResolutionStatus::Suspended`]; the engine must not advance its phase
//! until [`EventProcessor::acknowledge`] is called with the matching ticket,
//! which resumes with the next record.

mod processor;

pub use processor::{EventProcessor, PendingAction, ResolutionStatus};
