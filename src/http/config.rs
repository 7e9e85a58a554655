//! Session configuration
//!
//! Everything a [`WorldcatSession`](super::WorldcatSession) needs besides its
//! token: where to send requests, how to identify itself, how long to wait,
//! and how to retry.

use super::retry::RetryPolicy;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the WorldCat Metadata API
pub const DEFAULT_BASE_URL: &str = "https://metadata.api.oclc.org/worldcat";

/// Default `User-Agent`, `worldcat-client/<version>`
pub fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

/// Per-request timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// One limit for the whole request
    Total(Duration),
    /// Separate connect and read limits
    Split { connect: Duration, read: Duration },
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::Split {
            connect: Duration::from_secs(5),
            read: Duration::from_secs(5),
        }
    }
}

impl Timeout {
    /// Limit on the whole request, if one is set
    pub fn total(self) -> Option<Duration> {
        match self {
            Timeout::Total(total) => Some(total),
            Timeout::Split { .. } => None,
        }
    }

    /// Limit on establishing the connection, if set separately
    pub fn connect(self) -> Option<Duration> {
        match self {
            Timeout::Total(_) => None,
            Timeout::Split { connect, .. } => Some(connect),
        }
    }

    /// Limit on each read from the connection, if set separately
    pub fn read(self) -> Option<Duration> {
        match self {
            Timeout::Total(_) => None,
            Timeout::Split { read, .. } => Some(read),
        }
    }
}

/// Build the pooled HTTP client shared by every request of a session
pub(crate) fn build_client(
    agent: &str,
    timeout: Timeout,
    default_headers: &HashMap<String, String>,
) -> Result<Client> {
    let mut headers = HeaderMap::new();
    for (key, value) in default_headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("invalid value for header '{key}': {e}")))?;
        headers.insert(name, value);
    }

    let builder = Client::builder()
        .user_agent(agent)
        .default_headers(headers);
    let builder = match timeout {
        Timeout::Total(total) => builder.timeout(total),
        Timeout::Split { connect, read } => builder.connect_timeout(connect).read_timeout(read),
    };

    Ok(builder.build()?)
}

/// Configuration for a [`WorldcatSession`](super::WorldcatSession)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL that relative request paths are joined onto
    pub base_url: String,
    /// `User-Agent` sent with every request
    pub agent: String,
    /// Request timeout
    pub timeout: Timeout,
    /// Retry policy applied to every request
    pub retry: RetryPolicy,
    /// Treat the token as expired this long before its literal expiry
    pub expiry_skew: chrono::Duration,
    /// Headers added to every request
    pub default_headers: HashMap<String, String>,
    /// Time source for expiry checks
    pub clock: Arc<dyn Clock>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            agent: default_user_agent(),
            timeout: Timeout::default(),
            retry: RetryPolicy::default(),
            expiry_skew: chrono::Duration::seconds(1),
            default_headers: HashMap::new(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Check the settings that can be wrong at runtime
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must be http or https, got '{}'",
                self.base_url
            )));
        }
        if self.agent.trim().is_empty() {
            return Err(Error::invalid_argument("agent", "cannot be an empty string"));
        }
        if self.expiry_skew < chrono::Duration::zero() {
            return Err(Error::config("expiry skew cannot be negative"));
        }
        self.retry.validate()
    }
}

/// Builder for session config
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.config.agent = agent.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set the token expiry skew
    #[must_use]
    pub fn expiry_skew(mut self, skew: chrono::Duration) -> Self {
        self.config.expiry_skew = skew;
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the clock used for expiry checks
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config.clock = clock;
        self
    }

    /// Build the config
    pub fn build(self) -> Result<SessionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
