use career_chat_core::{
    ActorDeadError, Message, Orchestrator, OrchestratorBuilder, SessionStatus,
    SubmitOutcome, TranscriptSnapshot,
};
use career_chat_http_service::{HttpService, HttpServiceConfig};
use career_chat_service::AssistantService;

use crate::Draft;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    orchestrator_builder: OrchestratorBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified assistant service.
    pub fn with_service<S: AssistantService + 'static>(service: S) -> Self {
        let orchestrator_builder = OrchestratorBuilder::with_service(service);
        Self {
            orchestrator_builder,
        }
    }

    /// Creates a session builder that talks to the assistant service over
    /// HTTP.
    #[inline]
    pub fn http(config: HttpServiceConfig) -> Self {
        Self::with_service(HttpService::new(config))
    }

    /// Sets the assistant message shown when an exchange fails.
    #[inline]
    pub fn with_failure_notice<S: Into<String>>(mut self, notice: S) -> Self {
        self.orchestrator_builder =
            self.orchestrator_builder.with_failure_notice(notice);
        self
    }

    /// Rejects questions longer than `max` characters.
    #[inline]
    pub fn with_max_question_chars(mut self, max: usize) -> Self {
        self.orchestrator_builder =
            self.orchestrator_builder.with_max_question_chars(max);
        self
    }

    /// Attaches a callback to be invoked when a message is appended to the
    /// transcript.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(usize, &Message) + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator_builder =
            self.orchestrator_builder.on_message(on_message);
        self
    }

    /// Attaches a callback to be invoked when the session status changes.
    #[inline]
    pub fn on_status(
        mut self,
        on_status: impl Fn(SessionStatus) + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator_builder =
            self.orchestrator_builder.on_status(on_status);
        self
    }

    /// Attaches a callback to be invoked when an exchange has settled.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.orchestrator_builder = self.orchestrator_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session. Must be called within a tokio runtime.
    #[inline]
    pub fn build(self) -> Session {
        Session {
            orchestrator: self.orchestrator_builder.build(),
        }
    }
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session is basically a wrapper around [`Orchestrator`] that also
/// knows how to submit a [`Draft`]. Clones share the same conversation.
#[derive(Clone)]
pub struct Session {
    orchestrator: Orchestrator,
}

impl Session {
    /// Submits the text of `draft`, and clears the draft if the submission
    /// was accepted. A rejected draft is left untouched.
    pub async fn submit_draft(
        &self,
        draft: &mut Draft,
    ) -> Result<SubmitOutcome, ActorDeadError> {
        let outcome = self.orchestrator.submit(draft.as_str()).await?;
        if outcome.is_accepted() {
            draft.clear();
        }
        Ok(outcome)
    }

    /// Submits a question.
    #[inline]
    pub async fn submit<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<SubmitOutcome, ActorDeadError> {
        self.orchestrator.submit(text).await
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub async fn snapshot(&self) -> Result<TranscriptSnapshot, ActorDeadError> {
        self.orchestrator.snapshot().await
    }

    /// Returns the current status.
    #[inline]
    pub async fn status(&self) -> Result<SessionStatus, ActorDeadError> {
        self.orchestrator.status().await
    }
}
