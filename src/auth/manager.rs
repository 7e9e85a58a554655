//! Token manager
//!
//! Performs the client-credentials exchange against the OCLC authorization
//! server. Failed exchanges are never retried here: a rejected key should
//! fail fast. Transport failures surface as
//! [`Error::AuthorizationTransport`] so they stay apart from API outages.

use super::credentials::Credentials;
use super::token::AccessToken;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::http::{build_client, default_user_agent, Timeout};
use reqwest::header::ACCEPT;
use reqwest::{Client, Request};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Default OCLC authorization server
pub const DEFAULT_OAUTH_SERVER: &str = "https://oauth.oclc.org";

/// Acquires access tokens for one set of credentials
pub struct TokenManager {
    credentials: Credentials,
    oauth_server: String,
    agent: String,
    client: Client,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Create a manager with default settings
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Create a manager builder
    pub fn builder(credentials: Credentials) -> TokenManagerBuilder {
        TokenManagerBuilder {
            credentials,
            oauth_server: DEFAULT_OAUTH_SERVER.to_string(),
            agent: None,
            timeout: Timeout::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Full URL of the token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/token", self.oauth_server.trim_end_matches('/'))
    }

    /// Build the token exchange request without sending it
    pub fn token_request(&self) -> Result<Request> {
        let url = url::Url::parse(&self.token_url())?;
        let form = [
            ("grant_type", "client_credentials".to_string()),
            ("scope", self.credentials.scope_param()),
        ];

        let request = self
            .client
            .post(url)
            .basic_auth(self.credentials.key(), Some(self.credentials.secret()))
            .header(ACCEPT, "application/json")
            .form(&form)
            .build()?;
        Ok(request)
    }

    /// Exchange the credentials for a new access token
    pub async fn acquire(&self) -> Result<AccessToken> {
        let request = self.token_request()?;
        debug!(
            "Requesting access token from {} for scope '{}'",
            request.url(),
            self.credentials.scope_param()
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(Error::authorization_transport)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(Error::authorization_transport)?;

        if !status.is_success() {
            return Err(authorization_error(status.as_u16(), &body));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| Error::malformed_token(format!("token response is not JSON: {e}")))?;
        let token = AccessToken::from_response(json, self.clock.now(), self.credentials.scope())?;
        debug!("Access token acquired, expires at {}", token.expires_at());
        Ok(token)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("oauth_server", &self.oauth_server)
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TokenManager`]
pub struct TokenManagerBuilder {
    credentials: Credentials,
    oauth_server: String,
    agent: Option<String>,
    timeout: Timeout,
    clock: Arc<dyn Clock>,
}

impl TokenManagerBuilder {
    /// Override the authorization server base URL
    #[must_use]
    pub fn oauth_server(mut self, url: impl Into<String>) -> Self {
        self.oauth_server = url.into();
        self
    }

    /// Set the `User-Agent` sent with token requests
    #[must_use]
    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Set the token request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clock used for `expires_in` based expiry
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<TokenManager> {
        url::Url::parse(&self.oauth_server)?;

        let agent = match self.agent {
            Some(agent) if agent.trim().is_empty() => {
                return Err(Error::invalid_argument("agent", "cannot be an empty string"))
            }
            Some(agent) => agent,
            None => default_user_agent(),
        };
        let client = build_client(&agent, self.timeout, &Default::default())?;

        Ok(TokenManager {
            credentials: self.credentials,
            oauth_server: self.oauth_server,
            agent,
            client,
            clock: self.clock,
        })
    }
}

/// Map a rejected exchange onto the server's own code and message
pub(crate) fn authorization_error(status: u16, body: &str) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |names: &[&str]| -> Option<String> {
        let json = parsed.as_ref()?;
        names.iter().find_map(|name| match json.get(*name)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    };

    let code = field(&["code", "error"]).unwrap_or_else(|| status.to_string());
    let message = field(&["message", "error_description", "detail"]).unwrap_or_else(|| {
        if body.trim().is_empty() {
            "empty response body".to_string()
        } else {
            body.trim().to_string()
        }
    });
    Error::authorization(status, code, message)
}
