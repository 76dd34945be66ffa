//! Domain layer for Wayfinder.
//!
//! This module contains the core value types and pure computations of the
//! coordinator, independent of storage, network or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`geo`]: Coordinates, bounding boxes, haversine distance
//! - [`location`]: User position, accuracy tiers, destinations
//! - [`route`]: Routes, steps, maneuvers, travel modes
//! - [`place`]: Search results, nearby places, weather
//!
//! # Examples
//!
//! ```
//! use wayfinder::domain::{haversine_km, format_distance_km, Coordinate};
//!
//! let here = Coordinate::new(51.5007, -0.1246).unwrap();
//! let there = Coordinate::new(51.5074, -0.1278).unwrap();
//! assert_eq!(format_distance_km(haversine_km(here, there)), "777 m");
//! ```

pub mod error;
pub mod geo;
pub mod location;
pub mod place;
pub mod route;

pub use error::{LocationErrorKind, Result, ServiceError, WayfinderError};
pub use geo::{format_distance_km, haversine_km, BoundingBox, Coordinate, EARTH_RADIUS_KM};
pub use location::{AccuracyTier, Destination, Fix, PositionOptions, UserLocation};
pub use place::{
    short_place_name, NearbyPlace, Place, PlaceCategory, SearchResult, Weather,
    MAX_NEARBY_RESULTS, MAX_SEARCH_RESULTS, NEARBY_SPAN_DEGREES, SEARCH_BIAS_DEGREES,
};
pub use route::{
    format_duration, format_route_distance, format_step_distance, ManeuverKind, Route,
    RouteSummary, Step, TravelMode,
};
