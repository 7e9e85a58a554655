//! Per-request options
//!
//! [`ApiRequest`] carries what varies between calls to the same session:
//! query string, extra headers, body, and an optional timeout override.

use crate::types::QueryPairs;
use std::time::Duration;

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Query parameters in send order; keys may repeat
    pub query: QueryPairs,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Raw request body
    pub body: Option<Vec<u8>>,
    /// Override the session timeout for this request
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter when a value is present
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Repeat a query parameter once per value
    #[must_use]
    pub fn query_list<I>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        for value in values {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the `Accept` header
    #[must_use]
    pub fn accept(self, mime: &str) -> Self {
        self.header("Accept", mime)
    }

    /// Set the `Content-Type` header
    #[must_use]
    pub fn content_type(self, mime: &str) -> Self {
        self.header("Content-Type", mime)
    }

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up the first value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
