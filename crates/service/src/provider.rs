use std::error::Error;

use crate::error::ErrorKind;
use crate::wire::{ChatRequest, ChatResponse};

/// The error type for an assistant service.
pub trait ServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A remote (or fake) assistant that answers one question per call.
///
/// Implementations should behave like stateless objects: each call is an
/// independent request/response unit, and the caller may drop the service
/// at any time. The returned future must not borrow from `self`, since it
/// is driven on a separate task.
pub trait AssistantService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: ServiceError;

    /// Sends one question and resolves with the answer.
    fn ask(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static;
}
