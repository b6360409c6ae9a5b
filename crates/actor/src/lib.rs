//! A small mailbox actor runtime on top of tokio.
//!
//! Every actor owns its state and handles messages one at a time, each to
//! completion. Code that needs to wait (network calls, timers) runs in a
//! spawned task and reports back by sending another message, so state
//! changes are totally ordered without any locks.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod macros;
mod mailbox;
mod scheduler;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Message;
