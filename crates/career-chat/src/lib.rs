//! A chat client for an AI career assistant.
//!
//! The crate includes a CLI tool for chatting in the terminal. You can also
//! use it as a library, or through its C ABI, to put the chat into your own
//! host apps. Either way the conversation itself is driven by
//! [`career_chat_core`]; this crate only adds the input side.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod draft;
#[cfg(feature = "ffi")]
pub mod ffi;
mod session;

pub use draft::Draft;
pub use session::{Session, SessionBuilder};

/// Re-exports of [`career_chat_core`] crate.
pub mod core {
    pub use career_chat_core::*;
}

/// Re-exports of [`career_chat_http_service`] crate.
pub mod http {
    pub use career_chat_http_service::*;
}
