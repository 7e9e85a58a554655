//! Access token issued by the client-credentials exchange

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;

/// Timestamp layout of `expires_at` in token responses, always UTC
const EXPIRES_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// A bearer token and its absolute expiry
///
/// Tokens are never updated in place; a refresh produces a new value that
/// replaces the old one wholesale.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    token_type: String,
    expires_at: DateTime<Utc>,
    scope: String,
    server_response: Value,
}

impl AccessToken {
    /// Create a token directly
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>, scope: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: "bearer".to_string(),
            expires_at,
            scope: scope.into(),
            server_response: Value::Null,
        }
    }

    /// Build a token from a token endpoint response body
    ///
    /// `expires_at` is preferred; `expires_in` counted from `now` is the
    /// fallback. A body with neither is malformed.
    pub fn from_response(body: Value, now: DateTime<Utc>, requested_scope: &str) -> Result<Self> {
        let token = body
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::malformed_token("missing 'access_token'"))?
            .to_string();

        let expires_at = match body.get("expires_at").and_then(Value::as_str) {
            Some(raw) => parse_expires_at(raw)?,
            None => {
                let secs = body
                    .get("expires_in")
                    .and_then(parse_seconds)
                    .ok_or_else(|| {
                        Error::malformed_token("missing both 'expires_at' and 'expires_in'")
                    })?;
                Duration::try_seconds(secs)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        Error::malformed_token(format!("'expires_in' of {secs} is out of range"))
                    })?
            }
        };

        let token_type = body
            .get("token_type")
            .and_then(Value::as_str)
            .unwrap_or("bearer")
            .to_string();
        let scope = body
            .get("scope")
            .and_then(Value::as_str)
            .unwrap_or(requested_scope)
            .to_string();

        Ok(Self {
            token,
            token_type,
            expires_at,
            scope,
            server_response: body,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Raw JSON body returned by the token endpoint
    pub fn server_response(&self) -> &Value {
        &self.server_response
    }

    /// Value for the `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// True once `now` has reached `expires_at - skew` (boundary inclusive)
    pub fn is_expired_at(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        match self.expires_at.checked_sub_signed(skew) {
            Some(threshold) => now >= threshold,
            None => true,
        }
    }

    /// Expiry check against the system clock
    pub fn is_expired(&self, skew: Duration) -> bool {
        self.is_expired_at(Utc::now(), skew)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

fn parse_expires_at(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, EXPIRES_AT_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::malformed_token(format!("unparseable 'expires_at' '{raw}': {e}")))
}

// The service has been seen sending `expires_in` both as a number and a string.
fn parse_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
