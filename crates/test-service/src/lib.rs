//! A local fake assistant service for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use career_chat_service::{
    AssistantService, ChatRequest, ChatResponse, ErrorKind, ServiceError,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Shared {
    script: Mutex<Vec<PresetReply>>,
    questions: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Shared {
    /// Records a dispatched call and returns its index.
    fn begin(&self, question: String) -> usize {
        let mut questions =
            self.questions.lock().unwrap_or_else(PoisonError::into_inner);
        questions.push(question);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        questions.len() - 1
    }

    fn reply_at(&self, idx: usize) -> Option<PresetReply> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(idx)
            .cloned()
    }
}

/// Decrements the in-flight counter when a call settles or is dropped.
struct InFlight(Arc<Shared>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A local fake assistant service for testing purpose.
///
/// Calls consume the script in order: the n-th call gets the n-th preset
/// reply, regardless of the question. Calling past the end of the script
/// fails with [`ErrorKind::Other`].
///
/// Clones share the script and the recorded calls, so a test can keep a
/// clone for inspection after handing the service to the code under test.
#[derive(Clone, Default)]
pub struct TestService {
    shared: Arc<Shared>,
    delay: Option<Duration>,
}

impl TestService {
    /// Creates a service with the given script.
    pub fn with_replies(replies: impl IntoIterator<Item = PresetReply>) -> Self {
        let service = Self::default();
        for reply in replies {
            service.add_reply(reply);
        }
        service
    }

    /// Appends a reply to the script.
    #[inline]
    pub fn add_reply(&self, reply: PresetReply) {
        self.shared
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reply);
    }

    /// Makes every call take `duration` before settling. Combine with a
    /// paused tokio clock to control when settlement happens.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Questions received so far, in call order.
    pub fn questions(&self) -> Vec<String> {
        self.shared
            .questions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls dispatched so far.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.questions().len()
    }

    /// Number of calls dispatched but not yet settled.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::SeqCst)
    }

    /// The highest number of calls that were ever in flight at once.
    #[inline]
    pub fn peak_in_flight(&self) -> usize {
        self.shared.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Debug for TestService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestService")
            .field("delay", &self.delay)
            .field("call_count", &self.call_count())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl AssistantService for TestService {
    type Error = crate::Error;

    fn ask(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        let idx = self.shared.begin(req.question.clone());
        let guard = InFlight(Arc::clone(&self.shared));
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            let reply = guard.0.reply_at(idx);
            drop(guard);

            match reply {
                Some(PresetReply::Answer(answer)) => Ok(ChatResponse { answer }),
                Some(PresetReply::Failure(failure)) => Err(Error {
                    message: "preset failure",
                    kind: failure.into(),
                }),
                Some(PresetReply::Panic) => panic!("preset panic"),
                None => Err(Error {
                    message: "script exhausted",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
