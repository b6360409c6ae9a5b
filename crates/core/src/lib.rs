//! Core of the chat client: the transcript store and the request
//! orchestrator that drives one question/answer exchange at a time.
//!
//! The visualization layer only observes this crate. It reads transcript
//! snapshots and the session status, registers observers, and calls
//! [`Orchestrator::submit`]; it never mutates state directly.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod orchestrator;
mod outcome;
mod service_client;
pub mod transcript;

pub use career_chat_actor::ActorDeadError;
pub use orchestrator::{DEFAULT_FAILURE_NOTICE, Orchestrator, OrchestratorBuilder};
pub use outcome::{ExchangeOutcome, RejectReason, SessionStatus, SubmitOutcome};
pub use transcript::{Message, Role, TranscriptSnapshot};
