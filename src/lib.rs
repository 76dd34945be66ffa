//! Wayfinder: a location, route and search coordinator for map front ends.
//!
//! Wayfinder keeps the state of one mapping session and decides which
//! network calls to make as the user moves, picks destinations and types
//! search queries:
//! - One-shot and continuous geolocation with accuracy tiers and a persisted
//!   last-known fallback
//! - OSRM routing for driving, walking and cycling with turn-by-turn steps
//! - Debounced, location-biased Nominatim search and nearby category search
//! - Favorites and a capped recent-search history persisted as JSON
//! - Current weather from Open-Meteo
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Runtime (main.rs)                         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Stale response discard                           │
//! │  - Search debounce                                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - JSON I/O    │   │ - Requests    │
//! │ - Theming     │   │ - History cap │   │ - Timers      │
//! │ - Commands    │   │ - Backend API │   │ - Tracking    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Services, Infrastructure & Domain Layers           │
//! │  - OSRM, Nominatim, Open-Meteo clients (services/)  │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Geo math, routes, places, errors (domain/)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing with rotating file output                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`domain`]: Core value types and pure computations
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`services`]: External collaborator traits and HTTP clients
//! - [`storage`]: Preferences persistence
//! - [`worker`]: Async execution of service requests and timers
//! - [`ui`]: Notifications, terminal rendering and command parsing
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Configuration is read from an optional TOML file and `--set key=value`
//! overrides on the command line:
//!
//! ```toml
//! routing_url = "https://router.project-osrm.org"
//! geocoding_url = "https://nominatim.openstreetmap.org"
//! request_timeout_secs = 10
//! home = { lat = 51.5007, lng = -0.1246 }
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use wayfinder::app::{handle_event, AppState, Event};
//! use wayfinder::storage::{MemoryPreferences, Preferences};
//! use wayfinder::Config;
//!
//! let config = Config::default();
//! let prefs = Preferences::new(Box::new(MemoryPreferences::default()));
//! let mut state = AppState::new(prefs, config.default_center);
//!
//! for action in handle_event(&mut state, &Event::Started) {
//!     // Hand each action to a ServiceWorker...
//!     let _ = action;
//! }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod services;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, SessionPhase};
pub use domain::{Coordinate, Result, WayfinderError};
pub use ui::Theme;

use domain::Fix;
use serde::Deserialize;
use services::{
    build_client, ManualGeolocation, NominatimClient, OpenMeteoClient, OsrmClient, Services,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use storage::{JsonPreferences, MemoryPreferences, Preferences};

/// Runtime configuration.
///
/// Every field has a default, so an empty file or no file at all is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory for the preferences and log files.
    ///
    /// See [`infrastructure::get_data_dir`] for the fallback chain.
    pub data_dir: Option<String>,

    /// OSRM base URL.
    pub routing_url: String,

    /// Nominatim base URL.
    pub geocoding_url: String,

    /// Open-Meteo base URL.
    pub weather_url: String,

    /// `User-Agent` sent with every request. Nominatim rejects anonymous
    /// clients.
    pub user_agent: String,

    /// Per-request timeout for every HTTP call. Default: 10
    pub request_timeout_secs: u64,

    /// Initial viewport centre before any position is known.
    pub default_center: Coordinate,

    /// Position reported by the manual geolocation source at startup. Without
    /// it the first fix fails as "position unavailable".
    pub home: Option<Coordinate>,

    /// Accuracy radius in meters reported with `home`.
    pub home_accuracy_m: f64,

    /// Emit ANSI colours on the terminal.
    pub color: bool,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            routing_url: "https://router.project-osrm.org".to_string(),
            geocoding_url: "https://nominatim.openstreetmap.org".to_string(),
            weather_url: "https://api.open-meteo.com".to_string(),
            user_agent: concat!("wayfinder/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            default_center: Coordinate {
                lat: 51.5074,
                lng: -0.1278,
            },
            home: None,
            home_accuracy_m: 10.0,
            color: true,
            trace_level: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed or contains unknown keys
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| WayfinderError::Config(format!("{}: {e}", path.display())))
    }

    /// Builds configuration from `key=value` pairs, starting from defaults.
    ///
    /// Unparseable values fall back to their defaults and are logged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use wayfinder::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("home".to_string(), "51.5007,-0.1246".to_string());
    /// map.insert("request_timeout_secs".to_string(), "5".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.request_timeout_secs, 5);
    /// assert!(config.home.is_some());
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(map);
        config
    }

    /// Applies `key=value` overrides on top of the current values.
    pub fn apply_overrides(&mut self, map: &BTreeMap<String, String>) {
        for (key, value) in map {
            let value = value.trim();
            match key.as_str() {
                "data_dir" => self.data_dir = Some(value.to_string()),
                "routing_url" => self.routing_url = value.to_string(),
                "geocoding_url" => self.geocoding_url = value.to_string(),
                "weather_url" => self.weather_url = value.to_string(),
                "user_agent" => self.user_agent = value.to_string(),
                "request_timeout_secs" => match value.parse() {
                    Ok(secs) => self.request_timeout_secs = secs,
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring override"),
                },
                "default_center" => match value.parse() {
                    Ok(center) => self.default_center = center,
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring override"),
                },
                "home" => match value.parse() {
                    Ok(home) => self.home = Some(home),
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring override"),
                },
                "home_accuracy_m" => match value.parse() {
                    Ok(accuracy) => self.home_accuracy_m = accuracy,
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring override"),
                },
                "color" => self.color = !matches!(value, "false" | "0" | "no" | "off"),
                "trace_level" => self.trace_level = Some(value.to_string()),
                other => tracing::warn!(key = %other, "unknown configuration key"),
            }
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The startup position for the manual geolocation source, if configured.
    #[must_use]
    pub fn home_fix(&self) -> Option<Fix> {
        self.home.map(|coordinate| Fix {
            coordinate,
            accuracy_m: self.home_accuracy_m,
        })
    }
}

/// Opens the preferences store in the data directory.
///
/// Falls back to an in-memory store when the file cannot be opened, so the
/// session still works without persistence.
#[must_use]
pub fn open_preferences(config: &Config) -> Preferences {
    let path = infrastructure::get_data_dir(config.data_dir.as_deref())
        .join(infrastructure::PREFERENCES_FILE);

    match JsonPreferences::new(path.clone()) {
        Ok(store) => {
            tracing::debug!(path = %path.display(), "preferences opened");
            Preferences::new(Box::new(store))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "preferences unavailable, not persisting");
            Preferences::new(Box::new(MemoryPreferences::default()))
        }
    }
}

/// Builds the HTTP-backed services around `geolocation`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_services(config: &Config, geolocation: ManualGeolocation) -> Result<Services> {
    let client = build_client(&config.user_agent, config.request_timeout())?;

    Ok(Services {
        routing: Arc::new(OsrmClient::new(client.clone(), &config.routing_url)),
        geocoding: Arc::new(NominatimClient::new(client.clone(), &config.geocoding_url)),
        weather: Arc::new(OpenMeteoClient::new(client, &config.weather_url)),
        geolocation: Arc::new(geolocation),
    })
}

/// Creates the session state with persisted preferences restored.
///
/// # Example
///
/// ```rust,no_run
/// use wayfinder::{initialize, Config, SessionPhase};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.phase(), SessionPhase::Idle);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing wayfinder session");
    AppState::new(open_preferences(config), config.default_center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn toml_fields_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            routing_url = "http://localhost:5000"
            home = { lat = 48.8584, lng = 2.2945 }
            home_accuracy_m = 25.0
            color = false
            "#,
        )
        .unwrap();
        assert_eq!(config.routing_url, "http://localhost:5000");
        assert_eq!(
            config.home_fix(),
            Some(Fix {
                coordinate: Coordinate::new(48.8584, 2.2945).unwrap(),
                accuracy_m: 25.0,
            })
        );
        assert!(!config.color);
    }

    #[test]
    fn out_of_range_home_is_rejected() {
        assert!(toml::from_str::<Config>("home = { lat = 200.0, lng = 999.0 }").is_err());
        assert!(toml::from_str::<Config>("default_center = { lat = 0.0, lng = -181.0 }").is_err());
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        assert!(toml::from_str::<Config>("scan_depth = 4").is_err());
    }

    #[test]
    fn bad_overrides_keep_defaults() {
        let mut map = BTreeMap::new();
        map.insert("request_timeout_secs".to_string(), "soon".to_string());
        map.insert("color".to_string(), "off".to_string());
        let config = Config::from_map(&map);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.color);
    }

    #[test]
    fn from_file_reports_path_on_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wayfinder.toml");
        std::fs::write(&path, "request_timeout_secs = \"ten\"").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("wayfinder.toml"));
    }
}
