use std::fmt::{self, Debug};

use career_chat_actor::{Actor, Message};
use tokio::sync::oneshot;

use super::OrchestratorState;
use crate::outcome::{ExchangeOutcome, RejectReason, SessionStatus, SubmitOutcome};
use crate::service_client::ServiceClient;
use crate::transcript::{Message as TranscriptMessage, TranscriptSnapshot};

impl OrchestratorState {
    fn submit(&mut self, text: String, handle: &Actor<Self>) -> SubmitOutcome {
        if let Err(reason) = self.check_submission(&text) {
            debug!("rejected submission: {reason}");
            return SubmitOutcome::Rejected(reason);
        }
        let Some(service_client) = self.service_client.take() else {
            // The client is only ever away while awaiting a response.
            error!("service client missing while idle");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        };

        let exchange_id = self.next_exchange_id;
        self.next_exchange_id += 1;

        self.transcript.append(TranscriptMessage::user(text.clone()));
        self.set_status(SessionStatus::AwaitingResponse);
        info!(exchange_id, "dispatching question");

        let handle_clone = handle.clone();
        self.spawn_task(
            async move {
                let outcome = service_client.ask_isolated(text).await;
                handle_clone
                    .send(ExchangeSettled {
                        exchange_id,
                        service_client,
                        outcome,
                    })
                    .ok();
            },
            handle,
        );
        SubmitOutcome::Accepted
    }

    fn check_submission(&self, text: &str) -> Result<(), RejectReason> {
        if self.status != SessionStatus::Idle {
            return Err(RejectReason::Busy);
        }
        if text.trim().is_empty() {
            return Err(RejectReason::Blank);
        }
        if let Some(max) = self.max_question_chars {
            if text.chars().count() > max {
                return Err(RejectReason::TooLong);
            }
        }
        Ok(())
    }

    fn settle(
        &mut self,
        exchange_id: u64,
        service_client: ServiceClient,
        outcome: ExchangeOutcome,
    ) {
        let content = match outcome {
            ExchangeOutcome::Success(answer) => {
                info!(exchange_id, "exchange answered");
                answer
            }
            ExchangeOutcome::Failure(err) => {
                warn!(exchange_id, kind = %err.kind(), "exchange failed: {err}");
                self.failure_notice.clone()
            }
        };
        self.transcript.append(TranscriptMessage::assistant(content));

        self.service_client = Some(service_client);
        self.set_status(SessionStatus::Idle);
        debug_assert_eq!(self.transcript.len() % 2, 0);

        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status == status {
            return;
        }
        trace!(from = ?self.status, to = ?status, "status changed");
        self.status = status;
        if let Some(on_status) = &self.on_status {
            on_status(status);
        }
    }

    fn spawn_task<Fut>(&mut self, fut: Fut, handle: &Actor<Self>)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let handle = handle.clone();
        let task = tokio::spawn(async move {
            fut.await;
            handle.send(TaskEnded(task_id)).ok();
        });
        self.running_tasks.insert(task_id, task);
    }
}

#[derive(Debug)]
pub struct Submit {
    pub text: String,
    pub reply: oneshot::Sender<SubmitOutcome>,
}

impl Message<OrchestratorState> for Submit {
    fn handle(self, state: &mut OrchestratorState, handle: &Actor<OrchestratorState>) {
        let outcome = state.submit(self.text, handle);
        // The caller may have stopped waiting; the outcome stands anyway.
        self.reply.send(outcome).ok();
    }
}

#[derive(Debug)]
pub struct GetSnapshot(pub oneshot::Sender<TranscriptSnapshot>);

impl Message<OrchestratorState> for GetSnapshot {
    #[inline]
    fn handle(self, state: &mut OrchestratorState, _handle: &Actor<OrchestratorState>) {
        self.0.send(state.transcript.snapshot()).ok();
    }
}

#[derive(Debug)]
pub struct GetStatus(pub oneshot::Sender<SessionStatus>);

impl Message<OrchestratorState> for GetStatus {
    #[inline]
    fn handle(self, state: &mut OrchestratorState, _handle: &Actor<OrchestratorState>) {
        self.0.send(state.status).ok();
    }
}

struct ExchangeSettled {
    exchange_id: u64,
    service_client: ServiceClient,
    outcome: ExchangeOutcome,
}

impl Debug for ExchangeSettled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeSettled")
            .field("exchange_id", &self.exchange_id)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Message<OrchestratorState> for ExchangeSettled {
    fn handle(self, state: &mut OrchestratorState, _handle: &Actor<OrchestratorState>) {
        state.settle(self.exchange_id, self.service_client, self.outcome);
    }
}

#[derive(Debug)]
struct TaskEnded(u64);

impl Message<OrchestratorState> for TaskEnded {
    #[inline]
    fn handle(self, state: &mut OrchestratorState, _handle: &Actor<OrchestratorState>) {
        if state.running_tasks.remove(&self.0).is_none() {
            warn!(task_id = self.0, "unknown task ended");
        }
    }
}
