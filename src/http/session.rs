//! Authenticated session
//!
//! Every request leaving a [`WorldcatSession`] carries a bearer token that is
//! not expired by the session clock. An expired token is replaced before
//! dispatch, at most once per call, and retries reuse that token.

use super::config::{build_client, SessionConfig};
use super::request::ApiRequest;
use super::retry::{RetryingTransport, Transport};
use crate::auth::{AccessToken, TokenManager};
use crate::error::{Error, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Request, Response};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// HTTP session bound to one token manager
pub struct WorldcatSession {
    client: Client,
    transport: RetryingTransport<Client>,
    config: SessionConfig,
    token_manager: TokenManager,
    token: RwLock<AccessToken>,
}

impl WorldcatSession {
    /// Create a session around an already acquired token
    pub fn new(token_manager: TokenManager, token: AccessToken, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config.agent, config.timeout, &config.default_headers)?;
        let transport = RetryingTransport::new(client.clone(), config.retry.clone());

        Ok(Self {
            client,
            transport,
            config,
            token_manager,
            token: RwLock::new(token),
        })
    }

    /// Acquire a first token and open a session
    pub async fn open(token_manager: TokenManager, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let token = token_manager.acquire().await?;
        Self::new(token_manager, token, config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    /// Snapshot of the token currently held
    pub async fn token(&self) -> AccessToken {
        self.token.read().await.clone()
    }

    /// Replace the held token unconditionally
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        let mut guard = self.token.write().await;
        *guard = self.token_manager.acquire().await?;
        debug!("Access token refreshed, expires at {}", guard.expires_at());
        Ok(guard.clone())
    }

    /// Send a request to a path under the base URL, or to an absolute URL
    pub async fn send(&self, method: Method, path: &str, request: ApiRequest) -> Result<Response> {
        let url = self.resolve_url(path)?;
        let mut builder = self.client.request(method, url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        self.execute(builder.build()?).await
    }

    /// Send a caller-built request through the refresh and retry path
    ///
    /// An `Authorization` header already present on the request is kept.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        if !matches!(request.url().scheme(), "http" | "https") {
            return Err(Error::invalid_request(format!(
                "unsupported URL scheme '{}'",
                request.url().scheme()
            )));
        }

        let token = self.current_token().await?;
        if !request.headers().contains_key(AUTHORIZATION) {
            let mut value = HeaderValue::from_str(&token.bearer_header())
                .map_err(|_| Error::malformed_token("token is not a valid header value"))?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        debug!("{} {}", request.method(), request.url());
        self.transport.execute(request).await
    }

    /// Release the connection pool
    pub fn close(self) {
        debug!("Closing WorldCat session");
    }

    async fn current_token(&self) -> Result<AccessToken> {
        let skew = self.config.expiry_skew;
        {
            let token = self.token.read().await;
            if !token.is_expired_at(self.config.clock.now(), skew) {
                return Ok(token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if guard.is_expired_at(self.config.clock.now(), skew) {
            debug!(
                "Access token expired at {}, requesting a new one",
                guard.expires_at()
            );
            *guard = self.token_manager.acquire().await?;
        }
        Ok(guard.clone())
    }

    fn resolve_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

impl std::fmt::Debug for WorldcatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldcatSession")
            .field("config", &self.config)
            .field("token_manager", &self.token_manager)
            .finish_non_exhaustive()
    }
}
