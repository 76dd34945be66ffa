//! Search, nearby discovery and saved places.
//!
//! Forward search is debounced: each keystroke supersedes the previous query
//! and arms a timer, and only the request armed by the latest keystroke is
//! ever sent. Responses for anything older are dropped on arrival.

use super::actions::Action;
use super::handler::{present, set_destination};
use super::requests::Operation;
use super::state::AppState;
use crate::domain::{
    short_place_name, BoundingBox, Coordinate, Destination, NearbyPlace, Place, PlaceCategory,
    SearchResult, ServiceError, MAX_NEARBY_RESULTS, MAX_SEARCH_RESULTS, NEARBY_SPAN_DEGREES,
    SEARCH_BIAS_DEGREES,
};
use crate::storage::EntryId;
use crate::ui::{Notification, Severity};
use crate::worker::{RequestId, ServiceRequest};
use std::time::Duration;

/// Queries shorter than this (after trimming) never reach the geocoder.
pub const MIN_QUERY_CHARS: usize = 3;

/// Quiet period after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Name given to a favorite whose reverse lookup failed.
pub const FAVORITE_PLACEHOLDER: &str = "Saved Location";

pub(super) fn search_input(state: &mut AppState, query: &str, actions: &mut Vec<Action>) {
    state.search_query = query.to_string();
    let id = state.requests.begin(Operation::Search);

    if query.trim().chars().count() < MIN_QUERY_CHARS {
        state.requests.abandon(Operation::Search);
        state.search_results.clear();
        present(actions, Notification::SearchResults(Vec::new()));
        return;
    }

    actions.push(Action::ScheduleSearch {
        id,
        delay: SEARCH_DEBOUNCE,
    });
}

pub(super) fn debounce_elapsed(state: &mut AppState, id: RequestId, actions: &mut Vec<Action>) {
    if !state.requests.is_latest(Operation::Search, id) {
        tracing::trace!(id = %id, "debounce superseded");
        return;
    }
    let bias = state
        .location
        .map(|location| BoundingBox::around(location.coordinate, SEARCH_BIAS_DEGREES));
    let query = state.search_query.trim().to_string();
    tracing::debug!(id = %id, query = %query, biased = bias.is_some(), "sending search");
    actions.push(Action::Request(ServiceRequest::Search { id, query, bias }));
}

pub(super) fn on_search(
    state: &mut AppState,
    id: RequestId,
    result: Result<Vec<SearchResult>, ServiceError>,
    actions: &mut Vec<Action>,
) {
    if !state.requests.settle(Operation::Search, id) {
        return;
    }
    match result {
        Ok(mut results) => {
            results.truncate(MAX_SEARCH_RESULTS);
            if results.is_empty() {
                present(actions, Notification::toast("No results found", Severity::Info));
            }
            state.search_results.clone_from(&results);
            present(actions, Notification::SearchResults(results));
        }
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            present(
                actions,
                Notification::toast(format!("Search failed: {}", e.user_message()), Severity::Error),
            );
        }
    }
}

/// Makes `result` the destination, records it in recent history and centres
/// the map on it.
pub(super) fn select_search_result(
    state: &mut AppState,
    result: SearchResult,
    actions: &mut Vec<Action>,
) {
    set_destination(
        state,
        Destination::new(result.coordinate, Some(result.display_name.clone())),
        actions,
    );
    state
        .preferences
        .add_recent(result.display_name, result.coordinate, result.raw_address);
    center_on(state, result.coordinate, actions);
}

pub(super) fn add_favorite(state: &mut AppState, coordinate: Coordinate, actions: &mut Vec<Action>) {
    let id = state.requests.await_favorite_name(coordinate);
    tracing::debug!(id = %id, coordinate = %coordinate, "naming new favorite");
    actions.push(Action::Request(ServiceRequest::ReverseGeocode { id, coordinate }));
}

pub(super) fn on_favorite_name(
    state: &mut AppState,
    id: RequestId,
    result: Result<String, ServiceError>,
    actions: &mut Vec<Action>,
) {
    let Some(coordinate) = state.requests.take_favorite(id) else {
        tracing::debug!(id = %id, "reverse geocode for unknown favorite");
        return;
    };

    let (name, address) = match result {
        Ok(display_name) => (short_place_name(&display_name), display_name),
        Err(e) => {
            tracing::debug!(error = %e, "reverse geocode failed, using placeholder name");
            (FAVORITE_PLACEHOLDER.to_string(), coordinate.to_string())
        }
    };

    match state.preferences.add_favorite(name, coordinate, address) {
        Some(entry) => {
            tracing::info!(id = entry.id, name = %entry.name, "favorite saved");
            present(
                actions,
                Notification::toast(format!("Saved {} to favorites", entry.name), Severity::Success),
            );
            present(actions, Notification::Favorites(state.preferences.favorites()));
        }
        None => present(
            actions,
            Notification::toast("Could not save favorite", Severity::Error),
        ),
    }
}

pub(super) fn remove_favorite(state: &mut AppState, id: EntryId, actions: &mut Vec<Action>) {
    if state.preferences.remove_favorite(id) {
        present(actions, Notification::toast("Favorite removed", Severity::Info));
    }
    present(actions, Notification::Favorites(state.preferences.favorites()));
}

pub(super) fn select_favorite(state: &mut AppState, id: EntryId, actions: &mut Vec<Action>) {
    let Some(favorite) = state.preferences.favorites().into_iter().find(|f| f.id == id) else {
        present(actions, Notification::toast("Favorite not found", Severity::Warning));
        return;
    };
    set_destination(
        state,
        Destination::new(favorite.coordinate, Some(favorite.name)),
        actions,
    );
    center_on(state, favorite.coordinate, actions);
}

/// Routes to a recent place and moves it back to the front of the list.
pub(super) fn select_recent(state: &mut AppState, id: EntryId, actions: &mut Vec<Action>) {
    let Some(entry) = state.preferences.recent().into_iter().find(|r| r.id == id) else {
        present(actions, Notification::toast("Recent place not found", Severity::Warning));
        return;
    };
    set_destination(
        state,
        Destination::new(entry.coordinate, Some(entry.name.clone())),
        actions,
    );
    state
        .preferences
        .add_recent(entry.name, entry.coordinate, entry.address);
    center_on(state, entry.coordinate, actions);
}

pub(super) fn clear_recent(state: &mut AppState, actions: &mut Vec<Action>) {
    if state.preferences.clear_recent() {
        present(actions, Notification::toast("Recent searches cleared", Severity::Info));
        present(actions, Notification::Recent(Vec::new()));
    } else {
        present(
            actions,
            Notification::toast("Could not clear recent searches", Severity::Error),
        );
    }
}

pub(super) fn search_nearby(
    state: &mut AppState,
    center: Coordinate,
    category: PlaceCategory,
    actions: &mut Vec<Action>,
) {
    let id = state.requests.begin(Operation::Nearby);
    tracing::debug!(id = %id, %category, center = %center, "searching nearby");
    actions.push(Action::Request(ServiceRequest::Nearby {
        id,
        category,
        center,
        bounds: BoundingBox::around(center, NEARBY_SPAN_DEGREES),
    }));
}

pub(super) fn on_nearby(
    state: &mut AppState,
    id: RequestId,
    category: PlaceCategory,
    center: Coordinate,
    result: Result<Vec<Place>, ServiceError>,
    actions: &mut Vec<Action>,
) {
    if !state.requests.settle(Operation::Nearby, id) {
        return;
    }
    match result {
        Ok(places) => {
            let mut nearby: Vec<NearbyPlace> = places
                .into_iter()
                .take(MAX_NEARBY_RESULTS)
                .map(|place| NearbyPlace::measured_from(center, place))
                .collect();
            nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

            if nearby.is_empty() {
                present(
                    actions,
                    Notification::toast(format!("No {category} found nearby"), Severity::Info),
                );
            }
            state.nearby_results.clone_from(&nearby);
            present(
                actions,
                Notification::NearbyResults {
                    category,
                    places: nearby,
                },
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, %category, "nearby search failed");
            present(
                actions,
                Notification::toast(
                    format!("Nearby search failed: {}", e.user_message()),
                    Severity::Error,
                ),
            );
        }
    }
}

fn center_on(state: &mut AppState, coordinate: Coordinate, actions: &mut Vec<Action>) {
    state.map_center = coordinate;
    present(actions, Notification::CenterMap(coordinate));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, Event};
    use crate::domain::Fix;
    use crate::storage::{MemoryPreferences, Preferences};
    use crate::worker::ServiceResponse;

    fn state() -> AppState {
        let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
        AppState::new(prefs, coord(51.5074, -0.1278))
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn scheduled(actions: &[Action]) -> RequestId {
        actions
            .iter()
            .find_map(|a| match a {
                Action::ScheduleSearch { id, delay } => {
                    assert_eq!(*delay, SEARCH_DEBOUNCE);
                    Some(*id)
                }
                _ => None,
            })
            .expect("debounce scheduled")
    }

    fn hit(name: &str) -> SearchResult {
        SearchResult {
            coordinate: coord(40.7812, -73.9665),
            display_name: name.into(),
            raw_address: format!("{name}, New York"),
        }
    }

    #[test]
    fn short_query_clears_without_request() {
        let mut state = state();
        state.search_results = vec![hit("Old")];
        let actions = handle_event(&mut state, &Event::SearchInput("ab".into()));
        assert_eq!(
            actions,
            vec![Action::Present(Notification::SearchResults(Vec::new()))]
        );
        assert!(state.search_results.is_empty());
    }

    #[test]
    fn only_latest_keystroke_is_sent() {
        let mut state = state();
        let first = scheduled(&handle_event(&mut state, &Event::SearchInput("Central".into())));
        let second = scheduled(&handle_event(
            &mut state,
            &Event::SearchInput("Central Park".into()),
        ));

        assert!(handle_event(&mut state, &Event::SearchDebounceElapsed(first)).is_empty());
        let actions = handle_event(&mut state, &Event::SearchDebounceElapsed(second));
        assert_eq!(
            actions,
            vec![Action::Request(ServiceRequest::Search {
                id: second,
                query: "Central Park".into(),
                bias: None,
            })]
        );
    }

    #[test]
    fn stale_search_response_is_dropped() {
        let mut state = state();
        let first = scheduled(&handle_event(&mut state, &Event::SearchInput("Central".into())));
        handle_event(&mut state, &Event::SearchDebounceElapsed(first));
        let second = scheduled(&handle_event(
            &mut state,
            &Event::SearchInput("Central Park".into()),
        ));
        handle_event(&mut state, &Event::SearchDebounceElapsed(second));

        let late = handle_event(
            &mut state,
            &Event::ServiceResponse(ServiceResponse::Search {
                id: first,
                result: Ok(vec![hit("Central Station")]),
            }),
        );
        assert!(late.is_empty());

        handle_event(
            &mut state,
            &Event::ServiceResponse(ServiceResponse::Search {
                id: second,
                result: Ok(vec![hit("Central Park")]),
            }),
        );
        assert_eq!(state.search_results, vec![hit("Central Park")]);
    }

    #[test]
    fn search_is_biased_around_location() {
        let mut state = state();
        state.set_location(
            crate::domain::UserLocation::from_fix(Fix {
                coordinate: coord(51.5, -0.12),
                accuracy_m: 5.0,
            }),
            false,
        );
        let id = scheduled(&handle_event(&mut state, &Event::SearchInput("cafe".into())));
        let actions = handle_event(&mut state, &Event::SearchDebounceElapsed(id));
        let [Action::Request(ServiceRequest::Search { bias: Some(bias), .. })] = actions.as_slice()
        else {
            panic!("expected biased search, got {actions:?}");
        };
        assert!((bias.max_lat - 52.0).abs() < 1e-9);
        assert!((bias.min_lng + 0.62).abs() < 1e-9);
    }

    #[test]
    fn selecting_result_records_recent_and_centres() {
        let mut state = state();
        let actions = handle_event(&mut state, &Event::SelectSearchResult(hit("Central Park")));

        assert_eq!(
            state.destination.as_ref().map(|d| d.display_name.as_str()),
            Some("Central Park")
        );
        assert_eq!(state.preferences.recent().len(), 1);
        assert_eq!(
            actions.last(),
            Some(&Action::Present(Notification::CenterMap(coord(40.7812, -73.9665))))
        );
    }

    #[test]
    fn favorite_uses_first_address_component() {
        let mut state = state();
        let actions = handle_event(&mut state, &Event::AddFavorite { coordinate: None });
        let [Action::Request(ServiceRequest::ReverseGeocode { id, coordinate })] = actions.as_slice()
        else {
            panic!("expected reverse geocode");
        };
        assert_eq!(*coordinate, coord(51.5074, -0.1278));

        handle_event(
            &mut state,
            &Event::ServiceResponse(ServiceResponse::ReverseGeocode {
                id: *id,
                result: Ok("Trafalgar Square, Westminster, London".into()),
            }),
        );
        let favorites = state.preferences.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Trafalgar Square");
        assert_eq!(favorites[0].address, "Trafalgar Square, Westminster, London");
    }

    #[test]
    fn favorite_falls_back_to_placeholder() {
        let mut state = state();
        let actions = handle_event(
            &mut state,
            &Event::AddFavorite {
                coordinate: Some(coord(1.0, 2.0)),
            },
        );
        let [Action::Request(request)] = actions.as_slice() else {
            panic!("expected one request");
        };
        handle_event(
            &mut state,
            &Event::ServiceResponse(ServiceResponse::ReverseGeocode {
                id: request.id(),
                result: Err(ServiceError::EmptyResult),
            }),
        );
        assert_eq!(state.preferences.favorites()[0].name, FAVORITE_PLACEHOLDER);
    }

    #[test]
    fn removing_unknown_favorite_still_lists() {
        let mut state = state();
        let actions = handle_event(&mut state, &Event::RemoveFavorite(42));
        assert_eq!(
            actions,
            vec![Action::Present(Notification::Favorites(Vec::new()))]
        );
    }

    #[test]
    fn nearby_results_are_sorted_and_labelled() {
        let mut state = state();
        let center = coord(51.5007, -0.1246);
        let actions = handle_event(
            &mut state,
            &Event::SearchNearby {
                center: Some(center),
                category: PlaceCategory::Cafe,
            },
        );
        let [Action::Request(ServiceRequest::Nearby { id, bounds, .. })] = actions.as_slice() else {
            panic!("expected nearby request");
        };
        assert!(bounds.contains(center));

        let far = Place {
            coordinate: coord(51.5074, -0.1278),
            display_name: "Far".into(),
        };
        let close = Place {
            coordinate: coord(51.5010, -0.1246),
            display_name: "Close".into(),
        };
        handle_event(
            &mut state,
            &Event::ServiceResponse(ServiceResponse::Nearby {
                id: *id,
                category: PlaceCategory::Cafe,
                center,
                result: Ok(vec![far, close]),
            }),
        );
        let names: Vec<&str> = state
            .nearby_results
            .iter()
            .map(|n| n.place.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Close", "Far"]);
        assert_eq!(state.nearby_results[1].distance_label, "777 m");
    }

    #[test]
    fn clear_recent_empties_history() {
        let mut state = state();
        handle_event(&mut state, &Event::SelectSearchResult(hit("A")));
        handle_event(&mut state, &Event::ClearRecent);
        assert!(state.preferences.recent().is_empty());
    }
}
