//! Adapters for the external collaborators the coordinator consumes.
//!
//! Each collaborator sits behind an object-safe trait returning a boxed
//! future, so the worker can hold them as `Arc<dyn Trait>` and tests can swap
//! in scripted fakes.
//!
//! # Modules
//!
//! - `routing`: [`RoutingService`] and the OSRM client
//! - `geocoding`: [`GeocodingService`] and the Nominatim client
//! - `weather`: [`WeatherService`] and the Open-Meteo client
//! - `geolocation`: [`GeolocationSource`] and the manual source
//! - `http`: shared client construction

pub mod geocoding;
pub mod geolocation;
pub mod http;
pub mod routing;
pub mod weather;

pub use geocoding::{GeocodingService, NominatimClient};
pub use geolocation::{GeolocationSource, ManualGeolocation};
pub use http::build_client;
pub use routing::{parse_route_json, OsrmClient, RoutingService};
pub use weather::{OpenMeteoClient, WeatherService};

use std::sync::Arc;

/// The full set of external collaborators, shared with the worker.
#[derive(Clone)]
pub struct Services {
    pub routing: Arc<dyn RoutingService>,
    pub geocoding: Arc<dyn GeocodingService>,
    pub weather: Arc<dyn WeatherService>,
    pub geolocation: Arc<dyn GeolocationSource>,
}
