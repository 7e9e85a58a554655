//! Retry policy and the retrying transport
//!
//! Retries are bounded and opt-in per HTTP method. Only status codes and
//! transport failures are inspected, never response bodies.

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, Request, Response};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Sends a prepared request and yields the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(Client::execute(self, request).await?)
    }
}

/// Bounded retry configuration
///
/// With `total_retries == 0` the policy is disabled and every request is
/// sent exactly once regardless of the other settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    total_retries: u32,
    backoff_factor: f64,
    status_forcelist: HashSet<u16>,
    allowed_methods: HashSet<Method>,
    max_backoff: Duration,
    respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total_retries: 0,
            backoff_factor: 0.0,
            status_forcelist: HashSet::new(),
            allowed_methods: [Method::GET, Method::HEAD, Method::OPTIONS]
                .into_iter()
                .collect(),
            max_backoff: Duration::from_secs(120),
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a new policy builder
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    pub fn total_retries(&self) -> u32 {
        self.total_retries
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn status_forcelist(&self) -> &HashSet<u16> {
        &self.status_forcelist
    }

    pub fn allowed_methods(&self) -> &HashSet<Method> {
        &self.allowed_methods
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    pub fn respect_retry_after(&self) -> bool {
        self.respect_retry_after
    }

    pub fn is_enabled(&self) -> bool {
        self.total_retries > 0
    }

    /// Whether requests with this method may be retried at all
    pub fn applies_to(&self, method: &Method) -> bool {
        self.is_enabled() && self.allowed_methods.contains(method)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Delay before the retry that follows failed attempt number `attempt`
    ///
    /// `backoff_factor * 2^(attempt - 1)` seconds, or the server's
    /// `Retry-After` hint when honored, capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if self.respect_retry_after {
            if let Some(hint) = retry_after {
                return hint.min(self.max_backoff);
            }
        }

        let exponent = attempt.saturating_sub(1).min(62) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            return Err(Error::config(format!(
                "backoff factor must be a non-negative number, got {}",
                self.backoff_factor
            )));
        }
        if let Some(status) = self
            .status_forcelist
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            return Err(Error::config(format!(
                "{status} is not a valid HTTP status code"
            )));
        }
        Ok(())
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Maximum number of additional attempts
    #[must_use]
    pub fn total_retries(mut self, retries: u32) -> Self {
        self.policy.total_retries = retries;
        self
    }

    /// Base of the exponential backoff, in seconds
    #[must_use]
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.policy.backoff_factor = factor;
        self
    }

    /// Status codes that trigger a retry
    #[must_use]
    pub fn status_forcelist(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.policy.status_forcelist = statuses.into_iter().collect();
        self
    }

    /// Methods eligible for retry, replacing the read-only default
    #[must_use]
    pub fn allowed_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.policy.allowed_methods = methods.into_iter().collect();
        self
    }

    /// Upper bound on any single delay
    #[must_use]
    pub fn max_backoff(mut self, max: Duration) -> Self {
        self.policy.max_backoff = max;
        self
    }

    /// Honor `Retry-After` on retried responses
    #[must_use]
    pub fn respect_retry_after(mut self, respect: bool) -> Self {
        self.policy.respect_retry_after = respect;
        self
    }

    pub fn build(self) -> Result<RetryPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

/// Wraps a [`Transport`] with a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn execute(&self, request: Request) -> Result<Response> {
        if !self.policy.is_enabled() {
            return self.inner.execute(request).await;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        let retry_status = self.policy.applies_to(&method);
        let max_attempts = self.policy.total_retries + 1;
        let mut attempt = 1;

        loop {
            let current = request.try_clone().ok_or_else(|| {
                Error::invalid_request("request body is a stream and cannot be replayed on retry")
            })?;

            let (delay, reason) = match self.inner.execute(current).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !(retry_status && self.policy.is_retryable_status(status)) {
                        return Ok(response);
                    }
                    let reason = format!("{method} {url} returned HTTP {status}");
                    if attempt >= max_attempts {
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            last_status: Some(status),
                            reason,
                        });
                    }
                    (
                        self.policy.backoff(attempt, retry_after(&response)),
                        reason,
                    )
                }
                Err(err) => {
                    if !should_retry_error(&err, retry_status) {
                        return Err(err);
                    }
                    let reason = format!("{method} {url} failed: {err}");
                    if attempt >= max_attempts {
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            last_status: None,
                            reason,
                        });
                    }
                    (self.policy.backoff(attempt, None), reason)
                }
            };

            warn!(
                "{}, attempt {}/{}, retrying in {:?}",
                reason, attempt, max_attempts, delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
            debug!("Retrying {} {} (attempt {})", method, url, attempt);
        }
    }
}

// A refused connection never reached the server, so any method may retry it.
// Other transport failures are ambiguous and follow the method allowlist.
fn should_retry_error(err: &Error, method_allowed: bool) -> bool {
    match err {
        Error::Http(e) if e.is_connect() => true,
        Error::Http(_) => method_allowed && err.is_retryable(),
        _ => false,
    }
}

/// Parse `Retry-After` as delay seconds or an HTTP date
fn retry_after(response: &Response) -> Option<Duration> {
    let raw = response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    (at - Utc::now()).to_std().ok()
}
