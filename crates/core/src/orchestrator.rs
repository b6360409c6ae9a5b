mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use career_chat_actor::{ActorDeadError, define_actor};
use tokio::task::JoinHandle;

use crate::outcome::{SessionStatus, SubmitOutcome};
use crate::service_client::ServiceClient;
use crate::transcript::{Transcript, TranscriptSnapshot};
pub use builder::{DEFAULT_FAILURE_NOTICE, OrchestratorBuilder};
use state::{GetSnapshot, GetStatus, Submit};

type StatusObserver = Box<dyn Fn(SessionStatus) + Send + Sync>;
type IdleObserver = Box<dyn Fn() + Send + Sync>;

define_actor! {
    /// The request orchestrator of one chat session.
    ///
    /// It owns the transcript and the session status, and lets at most one
    /// question be outstanding at a time. A question submitted while another
    /// one is outstanding is rejected, not queued. Every dispatched question
    /// ends with exactly one assistant message in the transcript: the answer,
    /// or the failure notice if the call failed in any way.
    ///
    /// Clones share the same session. The session ends when the last clone
    /// is dropped, but an exchange that is already in flight still settles.
    pub Orchestrator => struct OrchestratorState {
        service_client: Option<ServiceClient>,
        transcript: Transcript,
        status: SessionStatus,
        failure_notice: String,
        max_question_chars: Option<usize>,
        running_tasks: HashMap<u64, JoinHandle<()>>,
        next_task_id: u64,
        next_exchange_id: u64,

        on_status: Option<StatusObserver>,
        on_idle: Option<IdleObserver>,
    }
}

impl Orchestrator {
    /// Submits a question.
    ///
    /// The question is appended and dispatched only if it is not blank, not
    /// over the length limit, and no other exchange is outstanding. The text
    /// is kept as-is; trimming only decides whether it is blank.
    pub async fn submit<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<SubmitOutcome, ActorDeadError> {
        let text = text.into();
        self.handle().ask(|reply| Submit { text, reply }).await
    }

    /// Returns the transcript as it is now.
    #[inline]
    pub async fn snapshot(&self) -> Result<TranscriptSnapshot, ActorDeadError> {
        self.handle().ask(GetSnapshot).await
    }

    /// Returns the current session status.
    #[inline]
    pub async fn status(&self) -> Result<SessionStatus, ActorDeadError> {
        self.handle().ask(GetStatus).await
    }
}

impl Orchestrator {
    fn spawn_from_builder(builder: OrchestratorBuilder) -> Self {
        let OrchestratorBuilder {
            service_client,
            failure_notice,
            max_question_chars,
            on_message,
            on_status,
            on_idle,
        } = builder;

        let state = OrchestratorState {
            service_client: Some(service_client),
            transcript: Transcript::with_observer(on_message),
            status: SessionStatus::Idle,
            failure_notice,
            max_question_chars,
            running_tasks: Default::default(),
            next_task_id: 1,
            next_exchange_id: 1,
            on_status,
            on_idle,
        };
        Self::spawn(state, "orchestrator")
    }
}
