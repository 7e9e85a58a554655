// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # WorldCat Metadata API client
//!
//! A typed async client for OCLC's WorldCat Metadata API.
//!
//! ## Features
//!
//! - **Client-Credentials Auth**: WSKey exchange against the OCLC authorization server
//! - **Transparent Token Refresh**: expired tokens are replaced before a request is sent
//! - **Bounded Retries**: status forcelist, method allowlist, capped exponential backoff
//! - **Endpoint Methods**: bibs, holdings, local data, brief bib and holdings search
//! - **Identifier Normalization**: `ocm`/`ocn`/`on` prefixes, integers, comma lists
//!
//! Responses are returned as raw `reqwest::Response` values; HTTP error
//! statuses are not turned into errors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use worldcat_client::{
//!     Credentials, MetadataSession, RecordFormat, RetryPolicy, SessionConfig, TokenManager,
//! };
//!
//! #[tokio::main]
//! async fn main() -> worldcat_client::Result<()> {
//!     let credentials = Credentials::new("my-key", "my-secret", "WorldCatMetadataAPI")?;
//!     let manager = TokenManager::new(credentials)?;
//!
//!     let config = SessionConfig::builder()
//!         .agent("my-app/1.0")
//!         .retry(
//!             RetryPolicy::builder()
//!                 .total_retries(3)
//!                 .backoff_factor(0.5)
//!                 .status_forcelist([500, 502, 503, 504])
//!                 .build()?,
//!         )
//!         .build()?;
//!
//!     let session = MetadataSession::open(manager, config).await?;
//!     let response = session.bib_get("ocm00012345", RecordFormat::MarcXml).await?;
//!     println!("{}", response.text().await?);
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    MetadataSession                      │
//! │   bib_*  holdings_*  lbd_*  lhr_*  *_search  *_browse   │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┴──────────────────────────────┐
//! │                    WorldcatSession                      │
//! │  expiry check → TokenManager::acquire → bearer header   │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┴──────────────────────────────┐
//! │              RetryingTransport<reqwest::Client>         │
//! │     status forcelist · method allowlist · backoff       │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Time sources for token expiry
pub mod clock;

/// OCLC number normalization
pub mod identifiers;

/// Client credentials, access tokens and the token exchange
pub mod auth;

/// Authenticated session with retry
pub mod http;

/// Metadata API endpoint methods
pub mod metadata;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AccessToken, Credentials, TokenManager};
pub use clock::{Clock, ManualClock, SystemClock};
pub use http::{ApiRequest, RetryPolicy, SessionConfig, Timeout, WorldcatSession};
pub use identifiers::{verify_oclc_number, verify_oclc_numbers, OclcNumber};
pub use metadata::MetadataSession;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
