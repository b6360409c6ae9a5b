use std::error::Error;
use std::fmt;

/// Returned when a message is sent to, or a reply is awaited from, an
/// actor whose mailbox loop has already stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorDeadError;

impl fmt::Display for ActorDeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the actor is no longer running")
    }
}

impl Error for ActorDeadError {}
