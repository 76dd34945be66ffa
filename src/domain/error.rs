//! Error types for the Wayfinder coordinator.
//!
//! This module defines the centralized error type [`WayfinderError`], the
//! upstream-call taxonomy [`ServiceError`], the geolocation failure
//! classification [`LocationErrorKind`], and a [`Result`] alias. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait
//! implementation.
//!
//! Service and location errors travel inside events between the worker and the
//! coordinator, so they carry owned strings and derive `Clone`/`PartialEq`.

use thiserror::Error;

/// The main error type for Wayfinder operations.
///
/// Covers startup and persistence failures. Failures of individual upstream
/// calls are [`ServiceError`]s and never become a `WayfinderError`.
///
/// # Examples
///
/// ```
/// use wayfinder::domain::WayfinderError;
///
/// fn validate_config() -> Result<(), WayfinderError> {
///     Err(WayfinderError::Config("missing routing_url".to_string()))
/// }
///
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum WayfinderError {
    /// Preferences storage operation failed.
    ///
    /// Covers serialization failures and quota exhaustion. Preference helpers
    /// swallow this and report a boolean instead of propagating it.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

}

/// Failure of a single request to an external HTTP service.
///
/// Every variant is surfaced as a transient notification. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Transport-level failure, including the request timeout.
    #[error("network request failed: {0}")]
    Network(String),

    /// The upstream answered with a status other than success (OSRM `code`).
    #[error("service answered with status {0}")]
    Status(String),

    /// The upstream answered successfully but with nothing usable.
    #[error("no results")]
    EmptyResult,

    /// The body could not be decoded into the fields we consume.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Builds a [`ServiceError`] from a `reqwest` failure.
    ///
    /// Decode failures are malformed responses; everything else (connect,
    /// timeout, non-2xx status) counts as a network failure.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Network(format!("HTTP {status}"))
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Short, user-facing description for toasts.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Network error. Check your connection and try again.",
            Self::Status(_) | Self::EmptyResult => "No results found.",
            Self::Malformed(_) => "Unexpected response from the service.",
        }
    }
}

/// Classification of a failed position acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationErrorKind {
    /// The user refused access to their position.
    #[error("permission denied")]
    PermissionDenied,

    /// The device could not determine a position.
    #[error("position unavailable")]
    PositionUnavailable,

    /// No fix arrived within the requested timeout.
    #[error("location request timed out")]
    Timeout,

    /// No geolocation capability is available at all.
    #[error("geolocation unsupported")]
    Unsupported,
}

impl LocationErrorKind {
    /// User-facing message for the toast shown after a failed fix.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access denied. Enable location permissions to see your position."
            }
            Self::PositionUnavailable => "Location information is unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unsupported => "Geolocation is not supported on this device.",
        }
    }
}

/// A specialized `Result` type for Wayfinder operations.
pub type Result<T> = std::result::Result<T, WayfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_messages_are_distinct() {
        let kinds = [
            LocationErrorKind::PermissionDenied,
            LocationErrorKind::PositionUnavailable,
            LocationErrorKind::Timeout,
            LocationErrorKind::Unsupported,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.user_message(), b.user_message());
            }
        }
    }
}
