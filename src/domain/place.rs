//! Search results, nearby places and weather readings.

use super::geo::{format_distance_km, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half-span in degrees of the box used to bias forward search around the
/// user.
pub const SEARCH_BIAS_DEGREES: f64 = 0.5;

/// Half-span in degrees of the nearby-search box (roughly 5 km).
pub const NEARBY_SPAN_DEGREES: f64 = 0.045;

/// Maximum number of forward-search results kept.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Maximum number of nearby-search results kept.
pub const MAX_NEARBY_RESULTS: usize = 10;

/// The leading component of a comma-separated geocoder display name.
///
/// # Examples
///
/// ```
/// use wayfinder::domain::short_place_name;
///
/// assert_eq!(short_place_name("Big Ben, Westminster, London"), "Big Ben");
/// ```
#[must_use]
pub fn short_place_name(display_name: &str) -> String {
    display_name
        .split(',')
        .next()
        .unwrap_or(display_name)
        .trim()
        .to_string()
}

/// One forward-search hit. Transient; replaced on every new query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub coordinate: Coordinate,
    /// Short name suitable for a destination label.
    pub display_name: String,
    /// Full address string as returned by the geocoder.
    pub raw_address: String,
}

/// Closed set of categories supported by nearby search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Cafe,
    Fuel,
    Hospital,
    Pharmacy,
    Bank,
}

impl PlaceCategory {
    pub const ALL: [Self; 6] = [
        Self::Restaurant,
        Self::Cafe,
        Self::Fuel,
        Self::Hospital,
        Self::Pharmacy,
        Self::Bank,
    ];

    /// Term understood by the geocoder for this category.
    #[must_use]
    pub const fn geocoder_tag(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Fuel => "fuel",
            Self::Hospital => "hospital",
            Self::Pharmacy => "pharmacy",
            Self::Bank => "bank",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.geocoder_tag())
    }
}

impl FromStr for PlaceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.geocoder_tag() == wanted)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// A geocoder hit without distance information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinate: Coordinate,
    pub display_name: String,
}

/// A nearby place annotated with its distance from the search centre.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    pub place: Place,
    pub distance_km: f64,
    pub distance_label: String,
}

impl NearbyPlace {
    #[must_use]
    pub fn measured_from(center: Coordinate, place: Place) -> Self {
        let distance_km = center.distance_km(&place.coordinate);
        Self {
            place,
            distance_km,
            distance_label: format_distance_km(distance_km),
        }
    }
}

/// Current conditions at the user's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub code: u16,
}

impl Weather {
    /// Plain-language description of the WMO weather code.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self.code {
            0 => "Clear sky",
            1..=3 => "Partly cloudy",
            45 | 48 => "Fog",
            51..=57 => "Drizzle",
            61..=67 => "Rain",
            71..=77 => "Snow",
            80..=82 => "Rain showers",
            85 | 86 => "Snow showers",
            95..=99 => "Thunderstorm",
            _ => "Unknown",
        }
    }
}
