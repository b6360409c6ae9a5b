/// Text typed into the input box that has not been submitted yet.
///
/// A draft belongs to the input surface, not to the session. Submitting it
/// through [`crate::Session::submit_draft`] clears it only when the
/// submission is accepted, so a rejected question stays around for the
/// user to edit or send again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Draft {
    text: String,
}

impl Draft {
    /// Creates an empty draft.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if nothing has been typed. A draft holding only
    /// whitespace is not empty, though submitting it is rejected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends a character.
    #[inline]
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Appends a string, e.g. pasted text.
    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Removes the last character, like a backspace.
    #[inline]
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Replaces the whole text.
    #[inline]
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    /// Empties the draft.
    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl From<&str> for Draft {
    #[inline]
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
        }
    }
}
