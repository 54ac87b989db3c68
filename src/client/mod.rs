//! HTTP access to the portal backend.
//! `connectivity` owns the cookie-carrying session and the identity seam the resolver uses;
//! `api` layers the per-role resource operations on top.

mod connectivity;
mod api;

pub use connectivity::{IdentityBackend, PortalClient};

use thiserror::Error;

/// Transport-level failures. Envelope failures (`success: false`) are not errors at this layer.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}
