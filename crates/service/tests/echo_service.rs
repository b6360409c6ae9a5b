use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use career_chat_service::{
    AssistantService, ChatRequest, ChatResponse, ErrorKind, ServiceError,
};

#[derive(Debug)]
struct EchoServiceError(ErrorKind);

impl Display for EchoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "echo failed: {}", self.0)
    }
}

impl Error for EchoServiceError {}

impl ServiceError for EchoServiceError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Answers by repeating the question, and refuses blank questions.
struct EchoService;

impl AssistantService for EchoService {
    type Error = EchoServiceError;

    fn ask(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        let result = if req.question.trim().is_empty() {
            Err(EchoServiceError(ErrorKind::Payload))
        } else {
            Ok(ChatResponse {
                answer: format!("You asked: {}", req.question),
            })
        };
        ready(result)
    }
}

#[tokio::test]
async fn test_answer() {
    let service = EchoService;
    let resp = service.ask(&ChatRequest::new("Hi")).await.unwrap();
    assert_eq!(resp.answer, "You asked: Hi");
}

#[tokio::test]
async fn test_error_kind() {
    let service = EchoService;
    let err = service.ask(&ChatRequest::new("  ")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Payload);
    assert_eq!(err.to_string(), "echo failed: malformed payload");
}

#[tokio::test]
async fn test_future_outlives_service() {
    let fut = {
        let service = EchoService;
        service.ask(&ChatRequest::new("still there?"))
    };
    assert_eq!(fut.await.unwrap().answer, "You asked: still there?");
}
