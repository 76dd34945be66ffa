//! End-to-end session tests: coordinator, worker and terminal surface wired
//! together over stub services.

use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use wayfinder::app::{handle_event, AppState, Event, SessionPhase};
use wayfinder::domain::{
    BoundingBox, Coordinate, Fix, LocationErrorKind, Place, PlaceCategory, Route, SearchResult,
    ServiceError, TravelMode, Weather,
};
use wayfinder::services::{
    GeocodingService, ManualGeolocation, RoutingService, Services, WeatherService,
};
use wayfinder::storage::{MemoryPreferences, Preferences};
use wayfinder::ui::{TerminalSurface, Theme};
use wayfinder::worker::ServiceWorker;

/// Records every call; walking routes fail.
#[derive(Default)]
struct Upstream {
    profiles: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
}

impl RoutingService for Upstream {
    fn route<'a>(
        &'a self,
        profile: &'a str,
        from: Coordinate,
        to: Coordinate,
    ) -> BoxFuture<'a, Result<Route, ServiceError>> {
        self.profiles.lock().unwrap().push(profile.to_string());
        let result = if profile == "foot" {
            Err(ServiceError::Status("NoRoute".into()))
        } else {
            Ok(Route {
                path: vec![from, to],
                distance_m: 1000.0,
                duration_s: 90.0,
                steps: vec![],
            })
        };
        Box::pin(async move { result })
    }
}

impl GeocodingService for Upstream {
    fn search<'a>(
        &'a self,
        query: &'a str,
        _bias: Option<BoundingBox>,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, ServiceError>> {
        self.queries.lock().unwrap().push(query.to_string());
        let hit = SearchResult {
            coordinate: coord(40.7812, -73.9665),
            display_name: query.to_string(),
            raw_address: format!("{query}, Manhattan, New York"),
        };
        Box::pin(async move { Ok(vec![hit]) })
    }

    fn reverse(&self, _coordinate: Coordinate) -> BoxFuture<'_, Result<String, ServiceError>> {
        Box::pin(async { Ok("Westminster Bridge, London, England".to_string()) })
    }

    fn category(
        &self,
        _category: PlaceCategory,
        _bounds: BoundingBox,
    ) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>> {
        Box::pin(async { Ok(vec![]) })
    }
}

impl WeatherService for Upstream {
    fn current(&self, _coordinate: Coordinate) -> BoxFuture<'_, Result<Weather, ServiceError>> {
        Box::pin(async {
            Ok(Weather {
                temperature_c: 14.0,
                code: 2,
            })
        })
    }
}

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

struct Harness {
    state: AppState,
    worker: ServiceWorker,
    surface: TerminalSurface<Vec<u8>>,
    events: UnboundedReceiver<Event>,
    upstream: Arc<Upstream>,
    geolocation: ManualGeolocation,
}

impl Harness {
    fn new(home: Option<Fix>) -> Self {
        let upstream = Arc::new(Upstream::default());
        let geolocation = ManualGeolocation::new(home);
        let services = Services {
            routing: upstream.clone(),
            geocoding: upstream.clone(),
            weather: upstream.clone(),
            geolocation: Arc::new(geolocation.clone()),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
        Self {
            state: AppState::new(prefs, coord(51.5074, -0.1278)),
            worker: ServiceWorker::new(services, tx),
            surface: TerminalSurface::new(Vec::new(), Theme::default(), false),
            events: rx,
            upstream,
            geolocation,
        }
    }

    /// Dispatches `event`, then every event the worker reports back until the
    /// session has been quiet for half a second.
    async fn run(&mut self, event: Event) {
        self.dispatch(&event);
        while let Ok(Some(next)) =
            tokio::time::timeout(Duration::from_millis(500), self.events.recv()).await
        {
            self.dispatch(&next);
        }
    }

    fn dispatch(&mut self, event: &Event) {
        for action in handle_event(&mut self.state, event) {
            self.worker.execute(action, &mut self.surface);
        }
    }

    fn output(self) -> String {
        String::from_utf8(self.surface.into_inner()).unwrap()
    }
}

fn westminster() -> Fix {
    Fix {
        coordinate: coord(51.5007, -0.1246),
        accuracy_m: 12.0,
    }
}

#[tokio::test(start_paused = true)]
async fn located_user_gets_one_driving_route() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    assert_eq!(h.state.phase(), SessionPhase::Located { fallback: false });
    assert!(h.worker.active_subscription().is_some());
    assert!(h.state.weather.is_some());

    h.run(Event::SetDestination {
        coordinate: coord(51.5074, -0.1278),
        name: Some("Trafalgar Square".into()),
    })
    .await;

    assert_eq!(h.state.phase(), SessionPhase::RouteActive);
    assert_eq!(*h.upstream.profiles.lock().unwrap(), vec!["car".to_string()]);
    let out = h.output();
    assert!(out.contains("Route by driving: 1.0 km, 2 min"), "{out}");
    assert!(out.contains("Trafalgar Square"), "{out}");
}

#[tokio::test(start_paused = true)]
async fn failed_route_keeps_previous_one_on_screen() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    h.run(Event::SetDestination {
        coordinate: coord(51.5074, -0.1278),
        name: None,
    })
    .await;
    let before = h.state.route.clone();
    assert!(before.is_some());

    h.run(Event::ChangeTravelMode(TravelMode::Walking)).await;

    assert_eq!(h.state.route, before);
    assert_eq!(h.state.travel_mode, TravelMode::Walking);
    assert_eq!(
        *h.upstream.profiles.lock().unwrap(),
        vec!["car".to_string(), "foot".to_string()]
    );
    assert!(h.output().contains("Could not calculate route"));
}

#[tokio::test(start_paused = true)]
async fn travel_mode_change_without_route_calls_nothing() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    h.run(Event::ChangeTravelMode(TravelMode::Cycling)).await;

    assert!(h.upstream.profiles.lock().unwrap().is_empty());
    assert_eq!(h.state.preferences.travel_mode(), TravelMode::Cycling);
}

#[tokio::test(start_paused = true)]
async fn superseded_keystrokes_never_reach_the_geocoder() {
    let mut h = Harness::new(None);
    h.dispatch(&Event::SearchInput("Central".into()));
    h.run(Event::SearchInput("Central Park".into())).await;

    assert_eq!(
        *h.upstream.queries.lock().unwrap(),
        vec!["Central Park".to_string()]
    );
    assert_eq!(h.state.search_results.len(), 1);
    assert!(h.output().contains("[1] Central Park"));
}

#[tokio::test(start_paused = true)]
async fn picking_a_result_routes_and_records_history() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    h.run(Event::SearchInput("Central Park".into())).await;
    h.run(Event::PickSearchResult(0)).await;

    let recent = h.state.preferences.recent();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].name, "Central Park");
    assert_eq!(h.state.map_center, coord(40.7812, -73.9665));
    assert_eq!(h.upstream.profiles.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn favorite_is_named_from_reverse_geocode() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    h.run(Event::AddFavorite { coordinate: None }).await;

    let favorites = h.state.preferences.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Westminster Bridge");
    assert_eq!(favorites[0].address, "Westminster Bridge, London, England");
}

#[tokio::test(start_paused = true)]
async fn unavailable_position_reports_error_and_stays_idle() {
    let mut h = Harness::new(None);
    h.run(Event::Started).await;

    assert_eq!(h.state.phase(), SessionPhase::Idle);
    assert!(h.worker.active_subscription().is_none());
    assert!(h.output().contains('✗'));
}

#[tokio::test(start_paused = true)]
async fn denied_permission_keeps_last_fix_and_explains() {
    let mut h = Harness::new(Some(westminster()));
    h.run(Event::Started).await;
    let before = h.state.location;

    h.geolocation.set_error(LocationErrorKind::PermissionDenied);
    h.run(Event::LocateRequested).await;

    assert_eq!(h.state.location, before);
    assert_eq!(h.state.phase(), SessionPhase::Located { fallback: false });
    assert!(h.output().contains("Location access needed"));
}

#[tokio::test(start_paused = true)]
async fn clear_route_with_nothing_to_clear_is_silent() {
    let mut h = Harness::new(None);
    h.run(Event::ClearRoute).await;
    assert_eq!(h.state.phase(), SessionPhase::Idle);
    assert!(h.output().is_empty());
}

#[test]
fn haversine_is_deterministic() {
    let a = coord(40.7128, -74.0060);
    let b = coord(40.7580, -73.9855);
    let d = wayfinder::domain::haversine_km(a, b);
    assert_eq!(d, wayfinder::domain::haversine_km(a, b));
    assert!((d - 5.3).abs() < 0.2, "{d}");
}
