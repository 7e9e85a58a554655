//! WorldCat Metadata API endpoints
//!
//! [`MetadataSession`] exposes one method per REST endpoint. Each method
//! validates and normalizes its arguments, builds the path and query, and
//! sends through the authenticated [`WorldcatSession`]. Responses are
//! returned unparsed; HTTP error statuses are the caller's to inspect.
//!
//! # Example
//!
//! ```ignore
//! use worldcat_client::{Credentials, MetadataSession, RecordFormat, SessionConfig, TokenManager};
//!
//! let credentials = Credentials::new("my-key", "my-secret", "WorldCatMetadataAPI")?;
//! let session = MetadataSession::open(TokenManager::new(credentials)?, SessionConfig::default()).await?;
//! let response = session.bib_get("ocm00012345", RecordFormat::MarcXml).await?;
//! ```

mod bibs;
mod holdings;
mod local;
mod search;

pub use holdings::CURRENT_HOLDINGS_BATCH_SIZE;
pub use local::{LocalBibsSearch, LocalHoldingsBrowse, LocalHoldingsSearch, SharedPrintLocalHoldingsSearch};
pub use search::{
    BriefBibsSearch, HoldingsFilters, OtherEditionsSearch, SharedPrintHoldingsSearch,
    SummaryHoldingsSearch,
};

use crate::auth::TokenManager;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, SessionConfig, WorldcatSession};
use reqwest::{Method, Response};
use std::fmt;

const JSON: &str = "application/json";

/// Endpoint methods over an authenticated session
#[derive(Debug)]
pub struct MetadataSession {
    session: WorldcatSession,
}

impl MetadataSession {
    /// Unsetting holdings also deletes the institution's dependent local
    /// holdings records unless the caller passes `false`
    pub const DEFAULT_CASCADE_DELETE: bool = true;

    pub fn new(session: WorldcatSession) -> Self {
        Self { session }
    }

    /// Acquire a first token and open a session
    pub async fn open(token_manager: TokenManager, config: SessionConfig) -> Result<Self> {
        Ok(Self::new(WorldcatSession::open(token_manager, config).await?))
    }

    /// The underlying authenticated session
    pub fn session(&self) -> &WorldcatSession {
        &self.session
    }

    pub fn into_inner(self) -> WorldcatSession {
        self.session
    }

    /// Release the connection pool
    pub fn close(self) {
        self.session.close();
    }

    async fn get(&self, path: &str, request: ApiRequest) -> Result<Response> {
        self.session.send(Method::GET, path, request).await
    }

    async fn post(&self, path: &str, request: ApiRequest) -> Result<Response> {
        self.session.send(Method::POST, path, request).await
    }

    async fn put(&self, path: &str, request: ApiRequest) -> Result<Response> {
        self.session.send(Method::PUT, path, request).await
    }

    async fn delete(&self, path: &str, request: ApiRequest) -> Result<Response> {
        self.session.send(Method::DELETE, path, request).await
    }
}

/// Reject a missing or blank record body
fn record_body(record: impl Into<Vec<u8>>) -> Result<Vec<u8>> {
    let body = record.into();
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::invalid_argument("record", "is missing"));
    }
    Ok(body)
}

/// Control numbers of local records are opaque but must form one path segment
fn control_number(value: impl fmt::Display) -> Result<String> {
    let value = value.to_string();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("control_number", "is missing"));
    }
    if trimmed.contains(&['/', '?', '#'][..]) {
        return Err(Error::invalid_argument(
            "control_number",
            format!("'{trimmed}' is not a valid control number"),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests;
