//! Results of submitting a question and of settling an exchange.

use std::fmt::{self, Display};

use career_chat_service::ServiceError;
use serde::Serialize;

/// Whether a new exchange may be started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No request is outstanding; `submit` is accepted.
    #[default]
    Idle,
    /// A request was dispatched and its terminal message is not yet in the
    /// transcript; `submit` is rejected.
    AwaitingResponse,
}

/// Why a submission had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The text is empty or whitespace only.
    Blank,
    /// Another exchange is still outstanding.
    Busy,
    /// The text is longer than the configured limit.
    TooLong,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Blank => f.write_str("nothing to send"),
            RejectReason::Busy => f.write_str("still waiting for an answer"),
            RejectReason::TooLong => f.write_str("question is too long"),
        }
    }
}

/// The reply to a submission.
///
/// A rejected submission leaves the transcript and the network untouched.
/// The reason is informational; callers are free to ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// The question was appended and dispatched.
    Accepted,
    /// Nothing happened.
    Rejected(RejectReason),
}

impl SubmitOutcome {
    /// Returns `true` for [`SubmitOutcome::Accepted`].
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// How a dispatched exchange settled.
#[derive(Debug)]
pub enum ExchangeOutcome {
    /// The service answered; the text is kept verbatim.
    Success(String),
    /// The call failed for any reason.
    Failure(Box<dyn ServiceError>),
}
