//! Shared HTTP client construction for the upstream adapters.

use crate::domain::error::{Result, WayfinderError};
use std::time::Duration;

/// Builds a `reqwest` client with the request timeout and user agent every
/// upstream adapter uses.
///
/// Nominatim's usage policy requires an identifying user agent, so one is
/// always set.
///
/// # Errors
///
/// Returns [`WayfinderError::Config`] if the TLS backend cannot be initialised.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| WayfinderError::Config(format!("failed to create HTTP client: {e}")))
}

/// Trims a trailing slash so endpoint paths can be appended with `format!`.
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
