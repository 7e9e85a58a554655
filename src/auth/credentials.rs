//! Client credentials for the token exchange

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// WSKey client credentials plus the requested scope
///
/// Immutable once constructed. Multiple scopes are supplied as one
/// space-separated string; the service does not accept structured scope
/// lists in the client-credentials grant.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCredentials")]
pub struct Credentials {
    key: String,
    secret: String,
    scope: String,
    context_registry_id: Option<String>,
}

impl Credentials {
    /// Validate and build credentials
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Result<Self> {
        let key = non_empty("key", key.into())?;
        let secret = non_empty("secret", secret.into())?;
        let scope = non_empty_trimmed("scope", scope.into())?;

        Ok(Self {
            key,
            secret,
            scope,
            context_registry_id: None,
        })
    }

    /// Act on behalf of the institution with the given registry id
    pub fn with_context(mut self, registry_id: impl Into<String>) -> Result<Self> {
        self.context_registry_id = Some(non_empty_trimmed("context_registry_id", registry_id.into())?);
        Ok(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn context_registry_id(&self) -> Option<&str> {
        self.context_registry_id.as_deref()
    }

    /// The `scope` form value sent to the token endpoint
    pub fn scope_param(&self) -> String {
        match &self.context_registry_id {
            Some(id) => format!("{} context:{id}", self.scope),
            None => self.scope.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("context_registry_id", &self.context_registry_id)
            .finish()
    }
}

/// Reject blank values; the value itself is stored as given
fn non_empty(argument: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(argument, "cannot be an empty string"));
    }
    Ok(value)
}

fn non_empty_trimmed(argument: &str, value: String) -> Result<String> {
    non_empty(argument, value).map(|v| v.trim().to_string())
}

#[derive(Deserialize)]
struct RawCredentials {
    key: String,
    secret: String,
    #[serde(alias = "scopes")]
    scope: ScopeValue,
    #[serde(default, alias = "registryId")]
    context_registry_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeValue {
    Single(String),
    Many(Vec<serde_json::Value>),
}

impl TryFrom<RawCredentials> for Credentials {
    type Error = Error;

    fn try_from(raw: RawCredentials) -> Result<Self> {
        let scope = match raw.scope {
            ScopeValue::Single(scope) => scope,
            ScopeValue::Many(_) => {
                return Err(Error::invalid_argument(
                    "scope",
                    "must be a single string; join multiple scopes with spaces",
                ))
            }
        };

        let credentials = Credentials::new(raw.key, raw.secret, scope)?;
        match raw.context_registry_id {
            Some(id) => credentials.with_context(id),
            None => Ok(credentials),
        }
    }
}
