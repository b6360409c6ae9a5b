//! The transcript: the ordered, append-only log of a chat session.

use std::fmt::{self, Debug};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Who a message is from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user.
    User,
    /// Produced on behalf of the assistant, including failure notices.
    Assistant,
}

/// One turn of the transcript. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    #[inline]
    pub(crate) fn user(content: String) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    #[inline]
    pub(crate) fn assistant(content: String) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Returns the role of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content, exactly as submitted or received. Assistant
    /// content may contain markdown.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A read-only view of the transcript at some point in time.
///
/// Snapshots are cheap to clone and never change: messages appended after
/// the snapshot was taken are not visible through it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TranscriptSnapshot(Arc<Vec<Message>>);

impl Deref for TranscriptSnapshot {
    type Target = [Message];

    #[inline]
    fn deref(&self) -> &[Message] {
        &self.0
    }
}

impl Serialize for TranscriptSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl Debug for TranscriptSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

pub(crate) type AppendObserver = Box<dyn Fn(usize, &Message) + Send + Sync>;

/// The transcript store.
///
/// Only the orchestrator appends to it; everyone else reads snapshots.
/// There is no way to edit or remove a message.
#[derive(Default)]
pub(crate) struct Transcript {
    messages: Arc<Vec<Message>>,
    on_append: Option<AppendObserver>,
}

impl Transcript {
    #[inline]
    pub fn with_observer(on_append: Option<AppendObserver>) -> Self {
        Self {
            messages: Default::default(),
            on_append,
        }
    }

    /// Appends `message` to the tail and returns its sequence number.
    pub fn append(&mut self, message: Message) -> usize {
        // Outstanding snapshots keep the old vector; only this store sees
        // the new one.
        let messages = Arc::make_mut(&mut self.messages);
        messages.push(message);
        let seq = messages.len() - 1;
        trace!(seq, role = ?messages[seq].role, "appended message");

        if let Some(on_append) = &self.on_append {
            on_append(seq, &messages[seq]);
        }
        seq
    }

    #[inline]
    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot(Arc::clone(&self.messages))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
