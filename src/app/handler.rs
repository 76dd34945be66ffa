//! Event handling and state transition logic.
//!
//! This module implements the coordinator: it processes user intents,
//! tracking updates and service responses, mutates [`AppState`] and returns
//! the [`Action`]s the runtime must perform.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the input surface, the worker or the tracking task
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State is mutated in place
//! 4. Actions are collected and returned for execution
//!
//! Nothing here performs I/O, so every transition can be driven synchronously
//! in tests. Concurrency between outstanding requests is resolved by request
//! id: a response whose id is no longer the latest for its operation is
//! dropped without touching state.
//!
//! # Event Types
//!
//! - **Location**: `Started`, `LocateRequested`, `LocationUpdate`,
//!   `TrackingFailed`, `VisibilityChanged`
//! - **Routing**: `SetDestination`, `RetryRoute`, `ChangeTravelMode`,
//!   `ClearRoute`
//! - **Search**: `SearchInput`, `SearchDebounceElapsed`, `SelectSearchResult`,
//!   `PickSearchResult`, `SearchNearby`
//! - **Saved places**: `AddFavorite`, `RemoveFavorite`, `SelectFavorite`,
//!   `SelectRecent`, `ShowFavorites`, `ShowRecent`, `ClearRecent`
//! - **Map**: `MapMoved`, `CenterOnUser`, `SetTheme`, `ToggleTheme`,
//!   `SetMapLayer`
//! - **Worker**: `ServiceResponse` with typed response variants
//!
//! # Example
//!
//! ```rust
//! use wayfinder::app::{handle_event, Action, AppState, Event};
//! use wayfinder::domain::Coordinate;
//! use wayfinder::storage::{MemoryPreferences, Preferences};
//! use wayfinder::worker::ServiceRequest;
//!
//! let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
//! let mut state = AppState::new(prefs, Coordinate::new(51.5074, -0.1278).unwrap());
//! let actions = handle_event(&mut state, &Event::LocateRequested);
//! assert!(matches!(
//!     actions.as_slice(),
//!     [Action::Request(ServiceRequest::LocationFix { .. })]
//! ));
//! ```

use super::actions::Action;
use super::modes::Visibility;
use super::places;
use super::requests::Operation;
use super::state::AppState;
use crate::domain::{
    Coordinate, Destination, Fix, LocationErrorKind, PlaceCategory, PositionOptions, Route,
    SearchResult, ServiceError, TravelMode, UserLocation, Weather,
};
use crate::storage::{EntryId, MapLayer, ThemePreference};
use crate::ui::{Notification, Severity};
use crate::worker::{RequestId, ServiceRequest, ServiceResponse, SubscriptionId};

/// Events triggered by user intents, the tracking task or service responses.
///
/// Each event is processed to completion before the next one, so transitions
/// are deterministic for a given event order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Session start: present restored preferences and request a first fix.
    Started,

    /// Ask for a fresh one-shot fix.
    LocateRequested,

    /// A reading delivered by the tracking subscription.
    LocationUpdate {
        subscription: SubscriptionId,
        fix: Fix,
    },

    /// The tracking subscription reported an error.
    TrackingFailed {
        subscription: SubscriptionId,
        kind: LocationErrorKind,
    },

    VisibilityChanged(Visibility),

    /// Set the destination, routing to it if a position is known.
    SetDestination {
        coordinate: Coordinate,
        name: Option<String>,
    },

    /// Re-request a route for the current destination.
    RetryRoute,

    ChangeTravelMode(TravelMode),

    /// Drop route and destination. The position is kept.
    ClearRoute,

    /// The search box text changed.
    SearchInput(String),

    /// The debounce timer armed for search `id` fired.
    SearchDebounceElapsed(RequestId),

    /// The user chose a search result.
    SelectSearchResult(SearchResult),

    /// The user chose the search result at this zero-based index.
    PickSearchResult(usize),

    /// Save a favorite at `coordinate`, or at the map centre when absent.
    AddFavorite { coordinate: Option<Coordinate> },

    RemoveFavorite(EntryId),
    SelectFavorite(EntryId),
    SelectRecent(EntryId),
    ShowFavorites,
    ShowRecent,
    ClearRecent,

    /// Search for `category` around `center`, or the map centre when absent.
    SearchNearby {
        center: Option<Coordinate>,
        category: PlaceCategory,
    },

    /// The viewport was panned.
    MapMoved(Coordinate),

    CenterOnUser,
    SetTheme(ThemePreference),
    ToggleTheme,
    SetMapLayer(MapLayer),

    /// A service call settled.
    ServiceResponse(ServiceResponse),
}

/// Processes an event, mutates session state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to the session state
/// * `event` - Event to process
///
/// # Returns
///
/// Actions to execute in order. Empty when the event needs no side effects,
/// for example a stale response or clearing a route that does not exist.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event for diagnosis.
pub fn handle_event(state: &mut AppState, event: &Event) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();
    let mut actions = Vec::new();

    match event {
        Event::Started => {
            present(&mut actions, Notification::Theme(state.theme));
            present(&mut actions, Notification::MapLayer(state.map_layer));
            present(&mut actions, Notification::TravelMode(state.travel_mode));
            present(&mut actions, Notification::CenterMap(state.map_center));
            request_fix(state, &mut actions);
        }
        Event::LocateRequested => request_fix(state, &mut actions),
        Event::LocationUpdate { subscription, fix } => {
            on_tracking_update(state, *subscription, *fix, &mut actions);
        }
        Event::TrackingFailed { subscription, kind } => {
            on_tracking_failed(state, *subscription, *kind, &mut actions);
        }
        Event::VisibilityChanged(visibility) => {
            on_visibility_changed(state, *visibility, &mut actions);
        }
        Event::SetDestination { coordinate, name } => {
            set_destination(
                state,
                Destination::new(*coordinate, name.clone()),
                &mut actions,
            );
        }
        Event::RetryRoute => {
            if !route_to_destination(state, &mut actions) {
                present(
                    &mut actions,
                    Notification::toast(
                        "Set a destination and enable location to get directions",
                        Severity::Warning,
                    ),
                );
            }
        }
        Event::ChangeTravelMode(mode) => change_travel_mode(state, *mode, &mut actions),
        Event::ClearRoute => {
            if state.clear_route() {
                tracing::info!("route cleared");
                present(&mut actions, Notification::ClearRoute);
                present(&mut actions, Notification::ClearDestination);
            } else {
                tracing::debug!("no route to clear");
            }
        }
        Event::SearchInput(query) => places::search_input(state, query, &mut actions),
        Event::SearchDebounceElapsed(id) => places::debounce_elapsed(state, *id, &mut actions),
        Event::SelectSearchResult(result) => {
            places::select_search_result(state, result.clone(), &mut actions);
        }
        Event::PickSearchResult(index) => {
            if let Some(result) = state.search_results.get(*index).cloned() {
                places::select_search_result(state, result, &mut actions);
            } else {
                present(
                    &mut actions,
                    Notification::toast(format!("No search result {}", index + 1), Severity::Warning),
                );
            }
        }
        Event::AddFavorite { coordinate } => {
            let coordinate = coordinate.unwrap_or(state.map_center);
            places::add_favorite(state, coordinate, &mut actions);
        }
        Event::RemoveFavorite(id) => places::remove_favorite(state, *id, &mut actions),
        Event::SelectFavorite(id) => places::select_favorite(state, *id, &mut actions),
        Event::SelectRecent(id) => places::select_recent(state, *id, &mut actions),
        Event::ShowFavorites => {
            present(&mut actions, Notification::Favorites(state.preferences.favorites()));
        }
        Event::ShowRecent => {
            present(&mut actions, Notification::Recent(state.preferences.recent()));
        }
        Event::ClearRecent => places::clear_recent(state, &mut actions),
        Event::SearchNearby { center, category } => {
            let center = center.unwrap_or(state.map_center);
            places::search_nearby(state, center, *category, &mut actions);
        }
        Event::MapMoved(center) => state.map_center = *center,
        Event::CenterOnUser => {
            if let Some(location) = state.location {
                state.map_center = location.coordinate;
                present(&mut actions, Notification::CenterMap(location.coordinate));
            } else {
                present(
                    &mut actions,
                    Notification::toast("Your location is not available", Severity::Warning),
                );
            }
        }
        Event::SetTheme(theme) => set_theme(state, *theme, &mut actions),
        Event::ToggleTheme => {
            let theme = state.theme.toggled();
            set_theme(state, theme, &mut actions);
        }
        Event::SetMapLayer(layer) => {
            state.map_layer = *layer;
            state.preferences.set_map_layer(*layer);
            present(&mut actions, Notification::MapLayer(*layer));
        }
        Event::ServiceResponse(response) => on_response(state, response.clone(), &mut actions),
    }

    actions
}

pub(super) fn present(actions: &mut Vec<Action>, notification: Notification) {
    actions.push(Action::Present(notification));
}

fn on_response(state: &mut AppState, response: ServiceResponse, actions: &mut Vec<Action>) {
    match response {
        ServiceResponse::LocationFix { id, result } => on_fix(state, id, result, actions),
        ServiceResponse::Route { id, result } => on_route(state, id, result, actions),
        ServiceResponse::Search { id, result } => places::on_search(state, id, result, actions),
        ServiceResponse::ReverseGeocode { id, result } => {
            places::on_favorite_name(state, id, result, actions);
        }
        ServiceResponse::Nearby {
            id,
            category,
            center,
            result,
        } => places::on_nearby(state, id, category, center, result, actions),
        ServiceResponse::Weather { id, result } => on_weather(state, id, result, actions),
    }
}

fn request_fix(state: &mut AppState, actions: &mut Vec<Action>) {
    let id = state.requests.begin(Operation::LocationFix);
    tracing::debug!(id = %id, "requesting location fix");
    actions.push(Action::Request(ServiceRequest::LocationFix {
        id,
        options: PositionOptions::one_shot(),
    }));
}

fn on_fix(
    state: &mut AppState,
    id: RequestId,
    result: Result<Fix, LocationErrorKind>,
    actions: &mut Vec<Action>,
) {
    if !state.requests.settle(Operation::LocationFix, id) {
        return;
    }

    match result {
        Ok(fix) => {
            let location = UserLocation::from_fix(fix);
            tracing::info!(
                coordinate = %location.coordinate,
                accuracy_m = location.accuracy_m,
                "location acquired"
            );
            show_location(state, location, false, actions);
            state.map_center = location.coordinate;
            present(actions, Notification::CenterMap(location.coordinate));
            start_tracking(state, actions);
            request_weather(state, location.coordinate, actions);
            route_if_waiting(state, actions);
        }
        Err(kind) => {
            tracing::warn!(error = %kind, "location fix failed");
            present(actions, Notification::toast(kind.user_message(), Severity::Error));
            if kind == LocationErrorKind::PermissionDenied {
                present(
                    actions,
                    Notification::Modal {
                        title: "Location access needed".to_string(),
                        body: "Allow location access to see where you are and get directions \
                               from your position."
                            .to_string(),
                    },
                );
            }
            if state.location.is_some() {
                return;
            }
            if let Some(stored) = state.preferences.last_location() {
                tracing::info!(coordinate = %stored.coordinate, "falling back to last known location");
                show_location(state, stored, true, actions);
                state.map_center = stored.coordinate;
                present(actions, Notification::CenterMap(stored.coordinate));
                present(
                    actions,
                    Notification::toast("Showing your last known location", Severity::Info),
                );
                route_if_waiting(state, actions);
            }
        }
    }
}

fn show_location(
    state: &mut AppState,
    location: UserLocation,
    fallback: bool,
    actions: &mut Vec<Action>,
) {
    state.set_location(location, fallback);
    present(
        actions,
        Notification::UserMarker {
            location,
            tier: location.accuracy_tier(),
            fallback,
        },
    );
}

fn start_tracking(state: &mut AppState, actions: &mut Vec<Action>) {
    if state.visibility == Visibility::Background {
        if let Some(previous) = state.requests.take_tracking() {
            actions.push(Action::StopTracking {
                subscription: previous,
            });
        }
        state.resume_tracking = true;
        return;
    }

    let (subscription, previous) = state.requests.replace_tracking();
    if let Some(previous) = previous {
        actions.push(Action::StopTracking {
            subscription: previous,
        });
    }
    tracing::debug!(subscription = %subscription, "starting location tracking");
    actions.push(Action::StartTracking {
        subscription,
        options: PositionOptions::tracking(),
    });
}

fn on_tracking_update(
    state: &mut AppState,
    subscription: SubscriptionId,
    fix: Fix,
    actions: &mut Vec<Action>,
) {
    if state.requests.tracking() != Some(subscription) {
        tracing::debug!(subscription = %subscription, "ignoring update from cancelled subscription");
        return;
    }
    let location = UserLocation::from_fix(fix);
    tracing::trace!(coordinate = %location.coordinate, "tracking update");
    show_location(state, location, false, actions);
    route_if_waiting(state, actions);
}

fn on_tracking_failed(
    state: &mut AppState,
    subscription: SubscriptionId,
    kind: LocationErrorKind,
    actions: &mut Vec<Action>,
) {
    if state.requests.tracking() != Some(subscription) {
        return;
    }
    tracing::warn!(subscription = %subscription, error = %kind, "tracking error");
    if kind == LocationErrorKind::PermissionDenied {
        if let Some(subscription) = state.requests.take_tracking() {
            actions.push(Action::StopTracking { subscription });
        }
        present(actions, Notification::toast(kind.user_message(), Severity::Error));
    }
}

fn on_visibility_changed(state: &mut AppState, visibility: Visibility, actions: &mut Vec<Action>) {
    if state.visibility == visibility {
        return;
    }
    state.visibility = visibility;
    tracing::debug!(?visibility, "visibility changed");

    match visibility {
        Visibility::Background => {
            if let Some(subscription) = state.requests.take_tracking() {
                actions.push(Action::StopTracking { subscription });
                state.resume_tracking = true;
            }
        }
        Visibility::Foreground => {
            if std::mem::take(&mut state.resume_tracking) {
                start_tracking(state, actions);
            }
        }
    }
}

/// Sets `destination` and routes to it when a position is known. The prior
/// route stays on screen until the new one arrives.
pub(super) fn set_destination(
    state: &mut AppState,
    destination: Destination,
    actions: &mut Vec<Action>,
) {
    tracing::info!(
        coordinate = %destination.coordinate,
        name = %destination.display_name,
        "destination set"
    );
    state.destination = Some(destination.clone());
    present(actions, Notification::DestinationMarker(destination));

    if !route_to_destination(state, actions) {
        present(
            actions,
            Notification::toast(
                "Enable location to get directions to this place",
                Severity::Info,
            ),
        );
    }
}

/// Issues a route request from the current position to the destination.
/// Returns `false` when either is missing.
fn route_to_destination(state: &mut AppState, actions: &mut Vec<Action>) -> bool {
    let (Some(location), Some(destination)) = (state.location, state.destination.as_ref()) else {
        return false;
    };
    let id = state.requests.begin(Operation::Route);
    let profile = state.travel_mode.profile();
    tracing::debug!(id = %id, profile, "requesting route");
    actions.push(Action::Request(ServiceRequest::Route {
        id,
        profile: profile.to_string(),
        from: location.coordinate,
        to: destination.coordinate,
    }));
    true
}

/// Routes to a destination that was set before any position was known.
fn route_if_waiting(state: &mut AppState, actions: &mut Vec<Action>) {
    if state.destination.is_some()
        && state.route.is_none()
        && !state.requests.is_pending(Operation::Route)
    {
        route_to_destination(state, actions);
    }
}

fn on_route(
    state: &mut AppState,
    id: RequestId,
    result: Result<Route, ServiceError>,
    actions: &mut Vec<Action>,
) {
    if !state.requests.settle(Operation::Route, id) {
        return;
    }

    match result {
        Ok(route) => {
            let summary = route.summary();
            tracing::info!(
                distance = %summary.distance,
                duration = %summary.duration,
                steps = route.steps.len(),
                "route ready"
            );
            present(actions, Notification::RoutePath(route.path.clone()));
            present(
                actions,
                Notification::RouteSummary {
                    distance: summary.distance,
                    duration: summary.duration,
                    mode: state.travel_mode,
                },
            );
            present(actions, Notification::TurnList(route.steps.clone()));
            state.route = Some(route);
        }
        Err(e) => {
            tracing::warn!(error = %e, "route request failed");
            present(
                actions,
                Notification::toast(
                    format!("Could not calculate route: {}", e.user_message()),
                    Severity::Error,
                ),
            );
        }
    }
}

fn change_travel_mode(state: &mut AppState, mode: TravelMode, actions: &mut Vec<Action>) {
    let recompute = state.route.is_some() || state.requests.is_pending(Operation::Route);
    state.travel_mode = mode;
    state.preferences.set_travel_mode(mode);
    present(actions, Notification::TravelMode(mode));

    if recompute {
        route_to_destination(state, actions);
    }
}

fn request_weather(state: &mut AppState, coordinate: Coordinate, actions: &mut Vec<Action>) {
    let id = state.requests.begin(Operation::Weather);
    actions.push(Action::Request(ServiceRequest::Weather { id, coordinate }));
}

fn on_weather(
    state: &mut AppState,
    id: RequestId,
    result: Result<Weather, ServiceError>,
    actions: &mut Vec<Action>,
) {
    if !state.requests.settle(Operation::Weather, id) {
        return;
    }
    match result {
        Ok(weather) => {
            state.weather = Some(weather.clone());
            present(actions, Notification::Weather(weather));
        }
        Err(e) => tracing::debug!(error = %e, "weather unavailable"),
    }
}

fn set_theme(state: &mut AppState, theme: ThemePreference, actions: &mut Vec<Action>) {
    state.theme = theme;
    state.preferences.set_theme(theme);
    present(actions, Notification::Theme(theme));
}
