//! HTTP transport module
//!
//! Provides the authenticated session that every endpoint method sends
//! through.
//!
//! # Features
//!
//! - **Token Refresh**: expired tokens are replaced before dispatch
//! - **Automatic Retries**: bounded retries on forcelisted statuses, opt-in per method
//! - **Backoff**: exponential, capped, `Retry-After` aware
//! - **Timeouts**: total or split connect/read limits

mod config;
mod request;
mod retry;
mod session;

pub(crate) use config::build_client;
pub use config::{default_user_agent, SessionConfig, SessionConfigBuilder, Timeout, DEFAULT_BASE_URL};
pub use request::ApiRequest;
pub use retry::{RetryPolicy, RetryPolicyBuilder, RetryingTransport, Transport};
pub use session::WorldcatSession;
