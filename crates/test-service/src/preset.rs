use career_chat_service::ErrorKind;
use serde::{Deserialize, Serialize};

/// How a preset failure presents itself to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    /// Like a refused connection or a timeout.
    Transport,
    /// Like a non-2xx response.
    Status,
    /// Like a body without a usable `answer`.
    Payload,
}

impl From<PresetFailure> for ErrorKind {
    fn from(failure: PresetFailure) -> Self {
        match failure {
            PresetFailure::Transport => ErrorKind::Transport,
            PresetFailure::Status => ErrorKind::Status,
            PresetFailure::Payload => ErrorKind::Payload,
        }
    }
}

/// What the service does for one call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Answers with the given text, verbatim.
    #[serde(rename = "answer")]
    Answer(String),
    /// Fails the call.
    #[serde(rename = "failure")]
    Failure(PresetFailure),
    /// Panics while the call is being polled, like a buggy service.
    #[serde(rename = "panic")]
    Panic,
}

impl PresetReply {
    /// Shorthand for [`PresetReply::Answer`].
    #[inline]
    pub fn answer<S: Into<String>>(text: S) -> Self {
        Self::Answer(text.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_script_from_json() {
        let script: Vec<PresetReply> = serde_json::from_value(json!([
            { "type": "answer", "data": "Consider software engineering." },
            { "type": "failure", "data": "transport" },
            { "type": "panic" }
        ]))
        .unwrap();

        assert_eq!(
            script,
            vec![
                PresetReply::answer("Consider software engineering."),
                PresetReply::Failure(PresetFailure::Transport),
                PresetReply::Panic,
            ]
        );
        assert_eq!(
            ErrorKind::from(PresetFailure::Transport),
            ErrorKind::Transport
        );
    }
}
