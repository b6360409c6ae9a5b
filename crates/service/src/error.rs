use std::fmt::{self, Display, Formatter};

/// The kind of error that ended an exchange.
///
/// The client does not show these to the user; every kind degrades to the
/// same failure notice. They exist for logging and for tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service could not be reached, or the connection broke.
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// The response body was not a usable answer.
    Payload,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => f.write_str("transport error"),
            ErrorKind::Status => f.write_str("unexpected status"),
            ErrorKind::Payload => f.write_str("malformed payload"),
            ErrorKind::Other => f.write_str("other error"),
        }
    }
}
