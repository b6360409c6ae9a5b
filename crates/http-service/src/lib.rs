//! An assistant service backed by the `POST /chat` HTTP endpoint.

#[macro_use]
extern crate tracing;

mod config;
mod decode;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use career_chat_service::{
    AssistantService, ChatRequest, ChatResponse, ErrorKind, ServiceError,
};
use reqwest::{Client, header};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_PATH, HttpServiceConfig,
    HttpServiceConfigBuilder,
};

/// Error type for [`HttpService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    pub(crate) kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_status() {
            ErrorKind::Status
        } else if err.is_decode() {
            ErrorKind::Payload
        } else {
            ErrorKind::Transport
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

impl ServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP assistant service.
///
/// Each call posts `{"question": ...}` to the configured endpoint and
/// expects `{"answer": ...}` back. Connection failures, timeouts, non-2xx
/// statuses and unusable bodies all come back as [`Error`].
#[derive(Clone, Debug)]
pub struct HttpService {
    client: Client,
    config: Arc<HttpServiceConfig>,
}

impl HttpService {
    /// Creates a new `HttpService` with the given configuration.
    #[inline]
    pub fn new(config: HttpServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this service.
    #[inline]
    pub fn config(&self) -> &HttpServiceConfig {
        &self.config
    }
}

impl AssistantService for HttpService {
    type Error = Error;

    fn ask(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(req);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        let resp_fut = builder.send();
        let endpoint = self.config.endpoint.clone();

        async move {
            trace!("posting question to {endpoint}");
            let resp = resp_fut
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(Error::from_reqwest)?;

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            decode::check_content_type(content_type.as_deref())?;

            let body = resp.bytes().await.map_err(Error::from_reqwest)?;
            trace!("received {} bytes", body.len());
            decode::decode_answer(&body)
        }
    }
}
