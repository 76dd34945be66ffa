//! Routing service adapter (OSRM v5 HTTP API).
//!
//! Only the subset of the OSRM response the coordinator consumes is decoded:
//! `code`, the first route's distance, duration, GeoJSON geometry and
//! per-leg steps. Turn instructions are synthesised from each step's maneuver
//! type, modifier and street name because OSRM does not return text.

use super::http::normalize_base_url;
use crate::domain::{Coordinate, ManeuverKind, Route, ServiceError, Step};
use futures_util::future::BoxFuture;
use serde::Deserialize;

/// Computes routes between two coordinates.
///
/// Implementations issue exactly one upstream request per call and never
/// retry.
pub trait RoutingService: Send + Sync {
    /// Requests a route for the routing `profile` (`car`, `foot`, `bike`).
    fn route<'a>(
        &'a self,
        profile: &'a str,
        from: Coordinate,
        to: Coordinate,
    ) -> BoxFuture<'a, Result<Route, ServiceError>>;
}

/// HTTP client for an OSRM server.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    /// Creates a client for the given OSRM endpoint (e.g. `http://localhost:5000`).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Route endpoint URL without query parameters. OSRM takes `lng,lat`.
    #[must_use]
    pub fn route_url(&self, profile: &str, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.base_url, profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl RoutingService for OsrmClient {
    fn route<'a>(
        &'a self,
        profile: &'a str,
        from: Coordinate,
        to: Coordinate,
    ) -> BoxFuture<'a, Result<Route, ServiceError>> {
        Box::pin(async move {
            let url = self.route_url(profile, from, to);
            tracing::debug!(url = %url, "requesting route");

            let response = self
                .client
                .get(&url)
                .query(&[("overview", "full"), ("geometries", "geojson"), ("steps", "true")])
                .send()
                .await
                .map_err(|e| ServiceError::from_reqwest(&e))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ServiceError::from_reqwest(&e))?;

            match serde_json::from_str::<OsrmRouteResponse>(&body) {
                Ok(parsed) => parse_route_response(parsed, from, to),
                Err(_) if !status.is_success() => {
                    Err(ServiceError::Network(format!("HTTP {status}")))
                }
                Err(e) => Err(ServiceError::Malformed(e.to_string())),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    #[serde(alias = "status")]
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    maneuver: OsrmManeuver,
}

#[derive(Debug, Default, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
    #[serde(default)]
    exit: Option<u32>,
}

/// Converts a decoded OSRM body into a [`Route`].
///
/// Fails when the status is not `Ok` or no route came back. A missing
/// geometry degrades to a straight segment between the endpoints.
pub(crate) fn parse_route_response(
    response: OsrmRouteResponse,
    from: Coordinate,
    to: Coordinate,
) -> Result<Route, ServiceError> {
    if response.code != "Ok" {
        return Err(ServiceError::Status(response.code));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ServiceError::EmptyResult)?;

    let path = route.geometry.map_or_else(
        || vec![from, to],
        |geometry| {
            geometry
                .coordinates
                .into_iter()
                .filter_map(|[lng, lat]| Coordinate::new(lat, lng))
                .collect()
        },
    );

    let steps = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .map(|step| Step {
            instruction: instruction_text(
                &step.maneuver.kind,
                step.maneuver.modifier.as_deref(),
                &step.name,
                step.maneuver.exit,
            ),
            maneuver: ManeuverKind::from_osrm(&step.maneuver.kind),
            distance_m: step.distance.max(0.0),
        })
        .collect();

    Ok(Route {
        path,
        distance_m: route.distance.max(0.0),
        duration_s: route.duration.max(0.0),
        steps,
    })
}

/// Decodes an OSRM JSON body and converts it in one go.
///
/// # Errors
///
/// Returns [`ServiceError::Malformed`] when the body does not decode, plus
/// everything [`parse_route_response`] reports.
pub fn parse_route_json(body: &str, from: Coordinate, to: Coordinate) -> Result<Route, ServiceError> {
    let parsed: OsrmRouteResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    parse_route_response(parsed, from, to)
}

/// Builds a human-readable instruction from OSRM maneuver fields.
fn instruction_text(kind: &str, modifier: Option<&str>, name: &str, exit: Option<u32>) -> String {
    let onto = if name.is_empty() {
        String::new()
    } else {
        format!(" onto {name}")
    };
    let side = modifier
        .filter(|m| m.contains("left") || m.contains("right"))
        .map(|m| format!(" on the {}", m.trim_start_matches("slight ").trim_start_matches("sharp ")))
        .unwrap_or_default();

    match kind {
        "depart" if name.is_empty() => "Depart".to_string(),
        "depart" => format!("Depart on {name}"),
        "arrive" => format!("Arrive at your destination{side}"),
        "turn" => match modifier {
            Some("straight") | None => format!("Go straight{onto}"),
            Some("uturn") => format!("Make a U-turn{onto}"),
            Some(m) => format!("Turn {m}{onto}"),
        },
        "merge" => format!("Merge{side}{onto}"),
        "on ramp" => format!("Take the ramp{side}{onto}"),
        "off ramp" => format!("Take the exit{side}{onto}"),
        "fork" => match modifier {
            Some(m) => format!("Keep {m} at the fork{onto}"),
            None => format!("Keep at the fork{onto}"),
        },
        "end of road" => match modifier {
            Some(m) => format!("Turn {m} at the end of the road{onto}"),
            None => format!("At the end of the road continue{onto}"),
        },
        "roundabout" | "rotary" | "roundabout turn" => match exit {
            Some(n) => format!("Enter the roundabout and take exit {n}{onto}"),
            None => format!("Enter the roundabout{onto}"),
        },
        "exit roundabout" | "exit rotary" => format!("Exit the roundabout{onto}"),
        _ => match modifier {
            Some(m) if m != "straight" && m != "uturn" => format!("Continue {m}{onto}"),
            _ => format!("Continue{onto}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(51.5007, -0.1246).unwrap(),
            Coordinate::new(51.5074, -0.1278).unwrap(),
        )
    }

    const FULL_RESPONSE: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 1234.5,
            "duration": 301.2,
            "geometry": { "type": "LineString", "coordinates": [[-0.1246, 51.5007], [-0.1260, 51.5040], [-0.1278, 51.5074]] },
            "legs": [{
                "steps": [
                    { "distance": 200.0, "name": "Bridge Street", "maneuver": { "type": "depart", "location": [-0.1246, 51.5007] } },
                    { "distance": 800.0, "name": "Whitehall", "maneuver": { "type": "turn", "modifier": "left" } },
                    { "distance": 234.5, "name": "", "maneuver": { "type": "arrive", "modifier": "right" } }
                ]
            }]
        }]
    }"#;

    #[test]
    fn parses_full_route() {
        let (from, to) = london();
        let route = parse_route_json(FULL_RESPONSE, from, to).unwrap();

        assert_eq!(route.path.len(), 3);
        assert!((route.path[2].lat - 51.5074).abs() < 1e-9);
        assert_eq!(route.steps.len(), 3);
        assert_eq!(route.steps[0].instruction, "Depart on Bridge Street");
        assert_eq!(route.steps[1].instruction, "Turn left onto Whitehall");
        assert_eq!(route.steps[1].maneuver, ManeuverKind::Turn);
        assert_eq!(route.steps[2].instruction, "Arrive at your destination on the right");
        assert_eq!(route.summary().distance, "1.2 km");
        assert_eq!(route.summary().duration, "6 min");
    }

    #[test]
    fn accepts_status_field_and_missing_geometry() {
        let (from, to) = london();
        let body = r#"{"status":"Ok","routes":[{"distance":1000,"duration":120,"legs":[{"steps":[{"distance":1000,"maneuver":{"type":"continue"}}]}]}]}"#;
        let route = parse_route_json(body, from, to).unwrap();
        assert_eq!(route.path, vec![from, to]);
        assert_eq!(route.summary().distance, "1.0 km");
        assert_eq!(route.summary().duration, "2 min");
        assert_eq!(route.steps[0].instruction, "Continue");
    }

    #[test]
    fn non_ok_status_fails() {
        let (from, to) = london();
        let err = parse_route_json(r#"{"code":"NoRoute","routes":[]}"#, from, to).unwrap_err();
        assert_eq!(err, ServiceError::Status("NoRoute".into()));
    }

    #[test]
    fn zero_routes_fails() {
        let (from, to) = london();
        let err = parse_route_json(r#"{"code":"Ok","routes":[]}"#, from, to).unwrap_err();
        assert_eq!(err, ServiceError::EmptyResult);
    }

    #[test]
    fn garbage_is_malformed() {
        let (from, to) = london();
        let err = parse_route_json("<html>", from, to).unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[test]
    fn url_uses_lng_lat_order() {
        let (from, to) = london();
        let client = OsrmClient::new(reqwest::Client::new(), "http://localhost:5000/");
        assert_eq!(
            client.route_url("foot", from, to),
            "http://localhost:5000/route/v1/foot/-0.124600,51.500700;-0.127800,51.507400"
        );
    }

    #[test]
    fn instructions_cover_maneuvers() {
        assert_eq!(instruction_text("turn", Some("uturn"), "", None), "Make a U-turn");
        assert_eq!(instruction_text("fork", Some("slight right"), "A1", None), "Keep slight right at the fork onto A1");
        assert_eq!(instruction_text("roundabout", Some("right"), "High St", Some(2)), "Enter the roundabout and take exit 2 onto High St");
        assert_eq!(instruction_text("off ramp", Some("slight left"), "", None), "Take the exit on the left");
        assert_eq!(instruction_text("new name", Some("straight"), "Mall", None), "Continue onto Mall");
        assert_eq!(instruction_text("end of road", Some("left"), "", None), "Turn left at the end of the road");
    }
}
