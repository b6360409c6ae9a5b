use career_chat_service::AssistantService;

use super::{IdleObserver, Orchestrator, StatusObserver};
use crate::outcome::SessionStatus;
use crate::service_client::ServiceClient;
use crate::transcript::{AppendObserver, Message};

/// The assistant message appended when an exchange fails.
pub const DEFAULT_FAILURE_NOTICE: &str = "Error connecting to AI service.";

/// [`Orchestrator`] builder.
pub struct OrchestratorBuilder {
    pub(crate) service_client: ServiceClient,
    pub(crate) failure_notice: String,
    pub(crate) max_question_chars: Option<usize>,
    pub(crate) on_message: Option<AppendObserver>,
    pub(crate) on_status: Option<StatusObserver>,
    pub(crate) on_idle: Option<IdleObserver>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the specified assistant service.
    #[inline]
    pub fn with_service<S: AssistantService + 'static>(service: S) -> Self {
        Self {
            service_client: ServiceClient::new(service),
            failure_notice: DEFAULT_FAILURE_NOTICE.to_owned(),
            max_question_chars: None,
            on_message: None,
            on_status: None,
            on_idle: None,
        }
    }

    /// Replaces the failure notice. A blank notice is ignored, since the
    /// transcript never holds empty messages.
    #[inline]
    pub fn with_failure_notice<S: Into<String>>(mut self, notice: S) -> Self {
        let notice = notice.into();
        if !notice.trim().is_empty() {
            self.failure_notice = notice;
        }
        self
    }

    /// Rejects questions longer than `max` characters. Unlimited by
    /// default.
    #[inline]
    pub fn with_max_question_chars(mut self, max: usize) -> Self {
        self.max_question_chars = Some(max);
        self
    }

    /// Attaches a callback invoked with each message appended to the
    /// transcript, together with its position.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(usize, &Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback invoked whenever the session status changes.
    #[inline]
    pub fn on_status(
        mut self,
        on_status: impl Fn(SessionStatus) + Send + Sync + 'static,
    ) -> Self {
        self.on_status = Some(Box::new(on_status));
        self
    }

    /// Attaches a callback invoked after each exchange has settled and the
    /// session is idle again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the orchestrator. Must be called within a tokio runtime.
    #[inline]
    pub fn build(self) -> Orchestrator {
        Orchestrator::spawn_from_builder(self)
    }
}
