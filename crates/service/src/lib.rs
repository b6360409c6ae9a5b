//! The contract between the chat client and the assistant service.
//!
//! The assistant service is an opaque remote endpoint: it takes a question
//! and eventually returns an answer, or fails. This crate only fixes the
//! shape of that exchange so the client core can be driven by any
//! implementation, be it the real HTTP endpoint or an in-process fake.
//!
//! Nothing here performs I/O.

#![deny(missing_docs)]

mod error;
mod provider;
mod wire;

pub use error::*;
pub use provider::*;
pub use wire::*;
