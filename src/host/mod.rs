//! Host-authoritative state propagation.
//!
//! One peer hosts: it owns the only mutable `GameState`, runs the engine,
//! and broadcasts full snapshots. Every other peer holds a `ClientMirror`
//! and acts only by sending intent messages. Transport is the caller's
//! business; this module deals in values and JSON strings.

pub mod client;
pub mod message;
pub mod session;

pub use client::ClientMirror;
pub use message::{HostMessage, IntentMessage, IntentResult};
pub use session::{Broadcast, HostSession};
