use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;

use career_chat_service::{
    AssistantService, ChatRequest, ChatResponse, ErrorKind, ServiceError,
};
use tracing::Instrument;

use crate::outcome::ExchangeOutcome;

type BoxedAskFuture = Pin<Box<dyn Future<Output = ExchangeOutcome> + Send>>;
type HandlerFn = Arc<dyn Fn(ChatRequest) -> BoxedAskFuture + Send + Sync>;

/// Raised when the service "succeeds" with nothing to show.
#[derive(Debug)]
struct EmptyAnswer;

impl Display for EmptyAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the service returned an empty answer")
    }
}

impl Error for EmptyAnswer {}

impl ServiceError for EmptyAnswer {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Payload
    }
}

/// Raised when the call panicked or was cancelled before settling.
#[derive(Debug)]
struct Aborted(String);

impl Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the service call was aborted: {}", self.0)
    }
}

impl Error for Aborted {}

impl ServiceError for Aborted {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A type-erased handle on an assistant service.
///
/// Every outcome of a call, including errors the service reports, is
/// mapped to an [`ExchangeOutcome`]; asking never fails.
#[derive(Clone)]
pub struct ServiceClient {
    handler_fn: HandlerFn,
}

impl ServiceClient {
    #[inline]
    pub fn new<S: AssistantService + 'static>(service: S) -> Self {
        let handler_fn: HandlerFn =
            Arc::new(move |req: ChatRequest| -> BoxedAskFuture {
                let fut = service.ask(&req);
                Box::pin(
                    async move {
                        trace!("asking: {req:?}");
                        settle::<S>(fut.await)
                    }
                    .instrument(trace_span!("exchange")),
                )
            });
        Self { handler_fn }
    }

    /// Asks one question and waits until the call settles.
    #[inline]
    pub async fn ask(&self, question: String) -> ExchangeOutcome {
        (self.handler_fn)(ChatRequest { question }).await
    }

    /// Like [`ServiceClient::ask`], but drives the call on a task of its
    /// own, so a service that panics still settles as a failure.
    pub async fn ask_isolated(&self, question: String) -> ExchangeOutcome {
        let client = self.clone();
        match tokio::spawn(async move { client.ask(question).await }).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("service call aborted: {err}");
                ExchangeOutcome::Failure(Box::new(Aborted(err.to_string())))
            }
        }
    }
}

fn settle<S: AssistantService>(
    result: Result<ChatResponse, S::Error>,
) -> ExchangeOutcome {
    match result {
        Ok(resp) if resp.answer.is_empty() => {
            warn!("got an empty answer");
            ExchangeOutcome::Failure(Box::new(EmptyAnswer))
        }
        Ok(resp) => {
            trace!("got an answer of {} bytes", resp.answer.len());
            ExchangeOutcome::Success(resp.answer)
        }
        Err(err) => {
            error!("got an error: {err}");
            ExchangeOutcome::Failure(Box::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use career_chat_test_service::{PresetFailure, PresetReply, TestService};

    use super::*;

    #[tokio::test]
    async fn test_success_is_verbatim() {
        let answer = "  ## Options\n\n* Data science\n* Teaching  ";
        let service = TestService::with_replies([PresetReply::answer(answer)]);
        let client = ServiceClient::new(service.clone());

        let outcome = client.ask("What now?".to_owned()).await;
        assert!(matches!(outcome, ExchangeOutcome::Success(ref text) if text == answer));
        assert_eq!(service.questions(), ["What now?"]);
    }

    #[tokio::test]
    async fn test_failures_keep_their_kind() {
        let service = TestService::with_replies([
            PresetReply::Failure(PresetFailure::Transport),
            PresetReply::answer(""),
        ]);
        let client = ServiceClient::new(service);

        let ExchangeOutcome::Failure(err) = client.ask("a".to_owned()).await
        else {
            panic!("expected a failure");
        };
        assert_eq!(err.kind(), ErrorKind::Transport);

        let ExchangeOutcome::Failure(err) = client.ask("b".to_owned()).await
        else {
            panic!("expected a failure");
        };
        assert_eq!(err.kind(), ErrorKind::Payload);

        // Past the end of the script.
        let ExchangeOutcome::Failure(err) = client.ask("c".to_owned()).await
        else {
            panic!("expected a failure");
        };
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_panicking_service_settles_as_failure() {
        let service = TestService::with_replies([
            PresetReply::Panic,
            PresetReply::answer("still here"),
        ]);
        let client = ServiceClient::new(service);

        let ExchangeOutcome::Failure(err) =
            client.ask_isolated("a".to_owned()).await
        else {
            panic!("expected a failure");
        };
        assert_eq!(err.kind(), ErrorKind::Other);

        let outcome = client.ask_isolated("b".to_owned()).await;
        assert!(matches!(outcome, ExchangeOutcome::Success(ref text) if text == "still here"));
    }
}
