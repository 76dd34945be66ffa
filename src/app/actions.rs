//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, the imperative commands produced
//! by the event handler. Actions bridge pure state transitions and effectful
//! operations: network calls, timers, the tracking subscription and
//! rendering.
//!
//! # Architecture
//!
//! [`handle_event`](super::handle_event) returns a `Vec<Action>` after each
//! event. The runtime executes them in order: service requests and timers go
//! to the [`ServiceWorker`](crate::worker::ServiceWorker), notifications go to
//! the presentation surface.
//!
//! # Example
//!
//! ```rust
//! use wayfinder::app::Action;
//! use wayfinder::ui::{Notification, Severity};
//!
//! let actions = vec![Action::Present(Notification::toast("Route cleared", Severity::Info))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::PositionOptions;
use crate::ui::Notification;
use crate::worker::{RequestId, ServiceRequest, SubscriptionId};
use std::time::Duration;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Issue a call to an external collaborator.
    ///
    /// The outcome comes back as
    /// [`Event::ServiceResponse`](super::Event::ServiceResponse) carrying the
    /// same request id.
    Request(ServiceRequest),

    /// Start the search debounce timer.
    ///
    /// When it fires the runtime posts
    /// [`Event::SearchDebounceElapsed`](super::Event::SearchDebounceElapsed)
    /// with `id`.
    ScheduleSearch {
        id: RequestId,
        delay: Duration,
    },

    /// Begin continuous location tracking under `subscription`.
    StartTracking {
        subscription: SubscriptionId,
        options: PositionOptions,
    },

    /// Cancel the tracking subscription `subscription`.
    StopTracking {
        subscription: SubscriptionId,
    },

    /// Render something on the presentation surface.
    Present(Notification),
}
