use serde::{Deserialize, Serialize};

/// Body of a chat request: `{"question": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question exactly as the user submitted it.
    pub question: String,
}

impl ChatRequest {
    /// Creates a request for `question`.
    #[inline]
    pub fn new<S: Into<String>>(question: S) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Body of a chat response: `{"answer": "..."}`.
///
/// The answer may contain markdown; it is passed along untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The answer text.
    pub answer: String,
}
