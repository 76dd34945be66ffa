//! Worker executing coordinator actions on the async runtime.
//!
//! The coordinator itself never awaits. It hands [`Action`]s to the
//! [`ServiceWorker`], which spawns one task per service request, arms debounce
//! timers and owns the single tracking task. Every outcome is posted back to
//! the coordinator as an [`Event`] on an unbounded channel, so responses are
//! applied in arrival order on the coordinator's own task.

use crate::app::{Action, Event};
use crate::domain::{Fix, LocationErrorKind, PositionOptions};
use crate::services::{GeolocationSource, Services};
use crate::ui::PresentationSurface;
use crate::worker::{RequestId, ServiceRequest, ServiceResponse, SubscriptionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Lower bound on the tracking poll period.
const MIN_TRACKING_INTERVAL: Duration = Duration::from_secs(1);

/// Executes actions and reports their outcomes as events.
///
/// Must be driven from inside a tokio runtime; every method that starts work
/// uses `tokio::spawn`.
pub struct ServiceWorker {
    services: Services,
    events: UnboundedSender<Event>,
    tracking: Option<(SubscriptionId, JoinHandle<()>)>,
}

impl ServiceWorker {
    #[must_use]
    pub fn new(services: Services, events: UnboundedSender<Event>) -> Self {
        Self {
            services,
            events,
            tracking: None,
        }
    }

    /// Executes one action. Notifications go straight to `surface`; all other
    /// actions start background work.
    pub fn execute(&mut self, action: Action, surface: &mut dyn PresentationSurface) {
        match action {
            Action::Request(request) => self.spawn_request(request),
            Action::ScheduleSearch { id, delay } => self.schedule_search(id, delay),
            Action::StartTracking {
                subscription,
                options,
            } => self.start_tracking(subscription, options),
            Action::StopTracking { subscription } => self.stop_tracking(subscription),
            Action::Present(notification) => surface.present(&notification),
        }
    }

    /// Subscription currently being polled, if any.
    #[must_use]
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.tracking.as_ref().map(|(subscription, _)| *subscription)
    }

    fn spawn_request(&self, request: ServiceRequest) {
        let services = self.services.clone();
        let events = self.events.clone();
        let span = tracing::debug_span!("service_request", kind = request.kind(), id = %request.id());

        tokio::spawn(
            async move {
                let response = perform(&services, request).await;
                tracing::debug!(ok = response_ok(&response), "request settled");
                if events.send(Event::ServiceResponse(response)).is_err() {
                    tracing::debug!("coordinator gone, dropping response");
                }
            }
            .instrument(span),
        );
    }

    fn schedule_search(&self, id: RequestId, delay: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A closed channel only means the session ended.
            let _ = events.send(Event::SearchDebounceElapsed(id));
        });
    }

    fn start_tracking(&mut self, subscription: SubscriptionId, options: PositionOptions) {
        if let Some((previous, handle)) = self.tracking.take() {
            tracing::debug!(subscription = %previous, "replacing tracking subscription");
            handle.abort();
        }

        let source = Arc::clone(&self.services.geolocation);
        let events = self.events.clone();
        let period = options.maximum_age.max(MIN_TRACKING_INTERVAL);
        let span = tracing::debug_span!("tracking", subscription = %subscription);

        let handle = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                let mut last = None;

                loop {
                    ticker.tick().await;
                    let reading = request_fix(source.as_ref(), options).await;
                    if last.as_ref() == Some(&reading) {
                        continue;
                    }
                    last = Some(reading);

                    let event = match reading {
                        Ok(fix) => Event::LocationUpdate { subscription, fix },
                        Err(kind) => Event::TrackingFailed { subscription, kind },
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }
            }
            .instrument(span),
        );

        tracing::info!(subscription = %subscription, period_ms = period.as_millis() as u64, "tracking started");
        self.tracking = Some((subscription, handle));
    }

    fn stop_tracking(&mut self, subscription: SubscriptionId) {
        match self.tracking.take() {
            Some((active, handle)) if active == subscription => {
                handle.abort();
                tracing::info!(subscription = %subscription, "tracking stopped");
            }
            other => {
                tracing::debug!(subscription = %subscription, "stop for inactive subscription");
                self.tracking = other;
            }
        }
    }
}

impl Drop for ServiceWorker {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.tracking.take() {
            handle.abort();
        }
    }
}

/// Performs one request against `services` and wraps the outcome.
pub async fn perform(services: &Services, request: ServiceRequest) -> ServiceResponse {
    match request {
        ServiceRequest::LocationFix { id, options } => ServiceResponse::LocationFix {
            id,
            result: request_fix(services.geolocation.as_ref(), options).await,
        },
        ServiceRequest::Route {
            id,
            profile,
            from,
            to,
        } => ServiceResponse::Route {
            id,
            result: services.routing.route(&profile, from, to).await,
        },
        ServiceRequest::Search { id, query, bias } => ServiceResponse::Search {
            id,
            result: services.geocoding.search(&query, bias).await,
        },
        ServiceRequest::ReverseGeocode { id, coordinate } => ServiceResponse::ReverseGeocode {
            id,
            result: services.geocoding.reverse(coordinate).await,
        },
        ServiceRequest::Nearby {
            id,
            category,
            center,
            bounds,
        } => ServiceResponse::Nearby {
            id,
            category,
            center,
            result: services.geocoding.category(category, bounds).await,
        },
        ServiceRequest::Weather { id, coordinate } => ServiceResponse::Weather {
            id,
            result: services.weather.current(coordinate).await,
        },
    }
}

/// Asks `source` for a fix, failing with [`LocationErrorKind::Timeout`] once
/// `options.timeout` has passed.
async fn request_fix(
    source: &dyn GeolocationSource,
    options: PositionOptions,
) -> Result<Fix, LocationErrorKind> {
    tokio::time::timeout(options.timeout, source.request_fix(options))
        .await
        .unwrap_or(Err(LocationErrorKind::Timeout))
}

const fn response_ok(response: &ServiceResponse) -> bool {
    match response {
        ServiceResponse::LocationFix { result, .. } => result.is_ok(),
        ServiceResponse::Route { result, .. } => result.is_ok(),
        ServiceResponse::Search { result, .. } => result.is_ok(),
        ServiceResponse::ReverseGeocode { result, .. } => result.is_ok(),
        ServiceResponse::Nearby { result, .. } => result.is_ok(),
        ServiceResponse::Weather { result, .. } => result.is_ok(),
    }
}
