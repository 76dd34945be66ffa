//! Coordinates, bounding boxes and great-circle distance.
//!
//! Distances are computed with the haversine formula on a spherical Earth of
//! radius 6371 km. The display thresholds (meters below 1 km, kilometers with
//! one decimal above) are part of the output contract and must not drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean Earth radius used for all distance computations, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair.
///
/// Values are validated on construction through [`Coordinate::new`]; the raw
/// fields are public for pattern matching and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Unvalidated wire shape; decoding goes through [`Coordinate::new`].
#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
            .ok_or_else(|| format!("coordinate out of range: {}, {}", raw.lat, raw.lng))
    }
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfinder::domain::Coordinate;
    ///
    /// assert!(Coordinate::new(51.5074, -0.1278).is_some());
    /// assert!(Coordinate::new(91.0, 0.0).is_none());
    /// ```
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    /// Parses `"lat,lng"` (whitespace around either part is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got {s:?}"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude {lat:?}: {e}"))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude {lng:?}: {e}"))?;
        Self::new(lat, lng).ok_or_else(|| format!("coordinate out of range: {lat}, {lng}"))
    }
}

/// An axis-aligned rectangle of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box extending `half_span_deg` in every direction from `center`,
    /// clamped to the valid coordinate range.
    #[must_use]
    pub fn around(center: Coordinate, half_span_deg: f64) -> Self {
        Self {
            min_lat: (center.lat - half_span_deg).max(-90.0),
            min_lng: (center.lng - half_span_deg).max(-180.0),
            max_lat: (center.lat + half_span_deg).min(90.0),
            max_lng: (center.lng + half_span_deg).min(180.0),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }

    /// Nominatim `viewbox` parameter: `left,top,right,bottom`.
    #[must_use]
    pub fn to_viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.max_lat, self.max_lng, self.min_lat
        )
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// ```text
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlng/2)
/// c = 2·atan2(√a, √(1−a))
/// d = R·c
/// ```
///
/// # Examples
///
/// ```
/// use wayfinder::domain::{haversine_km, Coordinate};
///
/// let a = Coordinate::new(40.730610, -73.935242).unwrap();
/// let b = Coordinate::new(40.758896, -73.985130).unwrap();
/// let d = haversine_km(a, b);
/// assert!((d - 5.2).abs() < 0.1);
/// ```
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Formats a distance given in kilometers for display.
///
/// Below 1 km the value is shown in whole meters, otherwise in kilometers
/// with one decimal.
///
/// # Examples
///
/// ```
/// use wayfinder::domain::format_distance_km;
///
/// assert_eq!(format_distance_km(0.4567), "457 m");
/// assert_eq!(format_distance_km(1.0), "1.0 km");
/// assert_eq!(format_distance_km(12.345), "12.3 km");
/// ```
#[must_use]
pub fn format_distance_km(km: f64) -> String {
    let meters = (km * 1000.0).round();
    if meters < 1000.0 {
        format!("{meters} m")
    } else {
        format!("{km:.1} km")
    }
}
