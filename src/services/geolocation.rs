//! Geolocation source abstraction.
//!
//! A source answers one-shot fix requests. Continuous tracking is built on
//! top of it by the worker, which polls the source on the tracking cadence
//! and owns the single active subscription.

use crate::domain::{Fix, LocationErrorKind, PositionOptions};
use futures_util::future::BoxFuture;
use std::sync::{Arc, RwLock};

pub trait GeolocationSource: Send + Sync {
    /// Requests a single position fix honouring `options`.
    ///
    /// The caller enforces `options.timeout`; implementations may return as
    /// soon as they have an answer.
    fn request_fix(&self, options: PositionOptions) -> BoxFuture<'_, Result<Fix, LocationErrorKind>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SourceState {
    Available(Fix),
    Failing(LocationErrorKind),
}

/// A source whose position is set by hand: from configuration at startup and
/// from the `here` command at runtime.
///
/// Clones share the same position, so the bootstrap can keep a handle while
/// the worker polls another.
#[derive(Debug, Clone)]
pub struct ManualGeolocation {
    state: Arc<RwLock<SourceState>>,
}

impl ManualGeolocation {
    /// A source reporting `initial`, or "position unavailable" until a
    /// position is set.
    #[must_use]
    pub fn new(initial: Option<Fix>) -> Self {
        let state = initial.map_or(
            SourceState::Failing(LocationErrorKind::PositionUnavailable),
            SourceState::Available,
        );
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn set_fix(&self, fix: Fix) {
        self.replace(SourceState::Available(fix));
    }

    /// Makes every subsequent request fail with `kind`, as the `here off`
    /// family of commands does.
    pub fn set_error(&self, kind: LocationErrorKind) {
        self.replace(SourceState::Failing(kind));
    }

    fn replace(&self, next: SourceState) {
        match self.state.write() {
            Ok(mut state) => *state = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    fn current(&self) -> Result<Fix, LocationErrorKind> {
        let state = match self.state.read() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        };
        match state {
            SourceState::Available(fix) => Ok(fix),
            SourceState::Failing(kind) => Err(kind),
        }
    }
}

impl GeolocationSource for ManualGeolocation {
    fn request_fix(&self, options: PositionOptions) -> BoxFuture<'_, Result<Fix, LocationErrorKind>> {
        let result = self.current();
        tracing::trace!(high_accuracy = options.high_accuracy, ok = result.is_ok(), "manual fix requested");
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn fix() -> Fix {
        Fix {
            coordinate: Coordinate::new(51.5, -0.12).unwrap(),
            accuracy_m: 15.0,
        }
    }

    #[tokio::test]
    async fn clones_share_position() {
        let source = ManualGeolocation::new(None);
        let handle = source.clone();

        assert_eq!(
            source.request_fix(PositionOptions::one_shot()).await,
            Err(LocationErrorKind::PositionUnavailable)
        );

        handle.set_fix(fix());
        assert_eq!(source.request_fix(PositionOptions::one_shot()).await, Ok(fix()));

        handle.set_error(LocationErrorKind::PermissionDenied);
        assert_eq!(
            source.request_fix(PositionOptions::tracking()).await,
            Err(LocationErrorKind::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn failing_source_recovers_once_a_fix_is_set() {
        let source = ManualGeolocation::new(Some(fix()));
        source.set_error(LocationErrorKind::Unsupported);
        assert_eq!(
            source.request_fix(PositionOptions::one_shot()).await,
            Err(LocationErrorKind::Unsupported)
        );

        source.set_fix(fix());
        assert_eq!(source.request_fix(PositionOptions::one_shot()).await, Ok(fix()));
    }
}
