//! Session state of the coordinator.
//!
//! [`AppState`] is the single source of truth for one user session: the
//! current position, destination and route, transient search results, the
//! restored preferences and the request ledger used to drop stale responses.
//! It is mutated only by [`handle_event`](super::handle_event).
//!
//! # Example
//!
//! ```rust
//! use wayfinder::app::{AppState, SessionPhase};
//! use wayfinder::domain::Coordinate;
//! use wayfinder::storage::{MemoryPreferences, Preferences};
//!
//! let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
//! let center = Coordinate::new(51.5074, -0.1278).unwrap();
//! let state = AppState::new(prefs, center);
//! assert_eq!(state.phase(), SessionPhase::Idle);
//! ```

use super::modes::{SessionPhase, Visibility};
use super::requests::{Operation, RequestLedger};
use crate::domain::{
    Coordinate, Destination, NearbyPlace, Route, SearchResult, TravelMode, UserLocation, Weather,
};
use crate::storage::{MapLayer, Preferences, ThemePreference};

/// Everything the coordinator knows about the running session.
#[derive(Debug)]
pub struct AppState {
    /// Last known position. Replaced wholesale on every update.
    pub location: Option<UserLocation>,

    /// `location` was restored from storage after a failed fix rather than
    /// observed live.
    pub location_is_fallback: bool,

    pub destination: Option<Destination>,

    /// Route currently shown. Only present while `location` and `destination`
    /// are both set.
    pub route: Option<Route>,

    pub travel_mode: TravelMode,

    /// Raw text of the latest search input.
    pub search_query: String,

    /// Results for the latest completed query, at most five.
    pub search_results: Vec<SearchResult>,

    /// Results of the latest nearby search, nearest first.
    pub nearby_results: Vec<NearbyPlace>,

    /// Centre of the viewport as last reported or set.
    pub map_center: Coordinate,

    pub weather: Option<Weather>,
    pub theme: ThemePreference,
    pub map_layer: MapLayer,
    pub visibility: Visibility,

    /// Tracking was suspended by a move to the background and should resume
    /// on return.
    pub resume_tracking: bool,

    pub preferences: Preferences,
    pub requests: RequestLedger,
}

impl AppState {
    /// Creates a session, restoring theme, map layer and travel mode from
    /// `preferences`.
    ///
    /// The persisted last location is not restored here; it is only used as a
    /// fallback when a live fix fails.
    #[must_use]
    pub fn new(preferences: Preferences, default_center: Coordinate) -> Self {
        let theme = preferences.theme();
        let map_layer = preferences.map_layer();
        let travel_mode = preferences.travel_mode();

        tracing::debug!(
            theme = theme.as_str(),
            map_layer = %map_layer,
            travel_mode = %travel_mode,
            "restored preferences"
        );

        Self {
            location: None,
            location_is_fallback: false,
            destination: None,
            route: None,
            travel_mode,
            search_query: String::new(),
            search_results: Vec::new(),
            nearby_results: Vec::new(),
            map_center: default_center,
            weather: None,
            theme,
            map_layer,
            visibility: Visibility::default(),
            resume_tracking: false,
            preferences,
            requests: RequestLedger::default(),
        }
    }

    /// Current lifecycle phase, derived from the session data.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.location, &self.route) {
            (Some(_), Some(_)) if self.destination.is_some() => SessionPhase::RouteActive,
            (Some(_), _) => SessionPhase::Located {
                fallback: self.location_is_fallback,
            },
            (None, _) if self.requests.is_pending(Operation::LocationFix) => SessionPhase::Locating,
            (None, _) => SessionPhase::Idle,
        }
    }

    /// Replaces the current position. Live positions are also persisted as
    /// the last known location.
    pub fn set_location(&mut self, location: UserLocation, fallback: bool) {
        self.location = Some(location);
        self.location_is_fallback = fallback;
        if !fallback {
            self.preferences.set_last_location(&location);
        }
    }

    /// Removes route, destination and any outstanding route request.
    ///
    /// Returns `false` when there was nothing to clear.
    pub fn clear_route(&mut self) -> bool {
        let had_route = self.route.take().is_some();
        let had_destination = self.destination.take().is_some();
        let had_pending = self.requests.is_pending(Operation::Route);
        self.requests.abandon(Operation::Route);
        had_route || had_destination || had_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fix;
    use crate::storage::MemoryPreferences;

    fn state() -> AppState {
        let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
        AppState::new(prefs, Coordinate::new(51.5074, -0.1278).unwrap())
    }

    fn here() -> UserLocation {
        UserLocation::from_fix(Fix {
            coordinate: Coordinate::new(51.5007, -0.1246).unwrap(),
            accuracy_m: 12.0,
        })
    }

    #[test]
    fn phase_follows_data() {
        let mut state = state();
        assert_eq!(state.phase(), SessionPhase::Idle);

        state.requests.begin(Operation::LocationFix);
        assert_eq!(state.phase(), SessionPhase::Locating);

        state.set_location(here(), false);
        assert_eq!(state.phase(), SessionPhase::Located { fallback: false });

        state.destination = Some(Destination::new(here().coordinate, None));
        state.route = Some(Route {
            path: vec![],
            distance_m: 0.0,
            duration_s: 0.0,
            steps: vec![],
        });
        assert_eq!(state.phase(), SessionPhase::RouteActive);

        assert!(state.clear_route());
        assert_eq!(state.phase(), SessionPhase::Located { fallback: false });
    }

    #[test]
    fn live_location_is_persisted_but_fallback_is_not() {
        let mut state = state();
        let live = here();
        state.set_location(live, false);
        assert_eq!(state.preferences.last_location(), Some(live));

        let mut moved = live;
        moved.accuracy_m = 500.0;
        state.set_location(moved, true);
        assert_eq!(state.preferences.last_location(), Some(live));
        assert_eq!(state.phase(), SessionPhase::Located { fallback: true });
    }

    #[test]
    fn clearing_nothing_reports_false() {
        let mut state = state();
        assert!(!state.clear_route());
    }

    #[test]
    fn restores_persisted_preferences() {
        let mut prefs = Preferences::new(Box::new(MemoryPreferences::default()));
        prefs.set_theme(ThemePreference::Dark);
        prefs.set_travel_mode(TravelMode::Cycling);
        let state = AppState::new(prefs, Coordinate::new(0.0, 0.0).unwrap());
        assert_eq!(state.theme, ThemePreference::Dark);
        assert_eq!(state.travel_mode, TravelMode::Cycling);
    }
}
