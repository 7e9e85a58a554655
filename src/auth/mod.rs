//! Authentication module
//!
//! Client-credentials grant against the OCLC authorization server.
//!
//! [`Credentials`] hold the WSKey pair and requested scope, the
//! [`TokenManager`] exchanges them for an [`AccessToken`], and the token
//! answers expiry questions without any I/O.

mod credentials;
mod manager;
mod token;

pub use credentials::Credentials;
pub use manager::{TokenManager, TokenManagerBuilder, DEFAULT_OAUTH_SERVER};
pub use token::AccessToken;
