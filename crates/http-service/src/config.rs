use std::time::Duration;

/// Base URL of a locally running assistant service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path of the chat endpoint, relative to the base URL.
pub const DEFAULT_CHAT_PATH: &str = "/chat";

/// Builder for [`HttpServiceConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpServiceConfigBuilder {
    base_url: Option<String>,
    path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpServiceConfigBuilder {
    /// Creates a builder with every option unset.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL, e.g. `https://assistant.example.com`.
    ///
    /// A trailing slash is ignored.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the endpoint path (`/chat` by default).
    #[inline]
    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Fails a request that takes longer than `timeout` as a transport
    /// error. Requests have no deadline by default.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> HttpServiceConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let path = self.path.unwrap_or_else(|| DEFAULT_CHAT_PATH.to_owned());

        let mut endpoint = base_url.trim_end_matches('/').to_owned();
        if !path.starts_with('/') {
            endpoint.push('/');
        }
        endpoint.push_str(&path);

        HttpServiceConfig {
            endpoint,
            timeout: self.timeout,
        }
    }
}

/// Configuration for [`crate::HttpService`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpServiceConfig {
    pub(crate) endpoint: String,
    pub(crate) timeout: Option<Duration>,
}

impl HttpServiceConfig {
    /// Returns the full URL requests are posted to.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the request deadline, if any.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        HttpServiceConfigBuilder::new().build()
    }
}
