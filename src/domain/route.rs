//! Route, turn-by-turn step and travel mode models.
//!
//! A [`Route`] is always replaced wholesale when a new one arrives; nothing in
//! the crate mutates one in place.

use super::geo::{format_distance_km, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the user travels. Persisted as a preference and mapped onto the
/// routing service's profile vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    /// Routing profile for this mode (`car`, `foot`, `bike`).
    #[must_use]
    pub const fn profile(self) -> &'static str {
        match self {
            Self::Driving => "car",
            Self::Walking => "foot",
            Self::Cycling => "bike",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "cycling" | "cycle" | "bike" => Ok(Self::Cycling),
            other => Err(format!("unknown travel mode: {other}")),
        }
    }
}

/// Category of a single turn-by-turn instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManeuverKind {
    Turn,
    Depart,
    Arrive,
    Merge,
    RampOn,
    RampOff,
    Fork,
    EndOfRoad,
    Continue,
    Roundabout,
}

impl ManeuverKind {
    /// Maps an OSRM `maneuver.type` onto our vocabulary.
    #[must_use]
    pub fn from_osrm(kind: &str) -> Self {
        match kind {
            "turn" => Self::Turn,
            "depart" => Self::Depart,
            "arrive" => Self::Arrive,
            "merge" => Self::Merge,
            "on ramp" => Self::RampOn,
            "off ramp" => Self::RampOff,
            "fork" => Self::Fork,
            "end of road" => Self::EndOfRoad,
            "roundabout" | "rotary" | "roundabout turn" | "exit roundabout" | "exit rotary" => {
                Self::Roundabout
            }
            _ => Self::Continue,
        }
    }

    /// Single-glyph marker for terminal turn lists.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Turn => "↱",
            Self::Depart => "●",
            Self::Arrive => "◎",
            Self::Merge => "⤙",
            Self::RampOn => "⤴",
            Self::RampOff => "⤵",
            Self::Fork => "⑂",
            Self::EndOfRoad => "⊣",
            Self::Continue => "↑",
            Self::Roundabout => "↻",
        }
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub instruction: String,
    pub maneuver: ManeuverKind,
    pub distance_m: f64,
}

/// A computed path between the user and the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<Step>,
}

impl Route {
    #[must_use]
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance: format_route_distance(self.distance_m),
            duration: format_duration(self.duration_s),
        }
    }
}

/// Display strings derived from a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub distance: String,
    pub duration: String,
}

/// Route length in kilometers rounded to one decimal.
#[must_use]
pub fn format_route_distance(distance_m: f64) -> String {
    format!("{:.1} km", distance_m.max(0.0) / 1000.0)
}

/// Travel time in whole minutes, rounded up.
///
/// # Examples
///
/// ```
/// use wayfinder::domain::format_duration;
///
/// assert_eq!(format_duration(120.0), "2 min");
/// assert_eq!(format_duration(121.0), "3 min");
/// ```
#[must_use]
pub fn format_duration(duration_s: f64) -> String {
    let minutes = (duration_s.max(0.0) / 60.0).ceil();
    format!("{minutes:.0} min")
}

/// Distance label for a single step (meters under 1 km).
#[must_use]
pub fn format_step_distance(distance_m: f64) -> String {
    format_distance_km(distance_m.max(0.0) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_follow_mode() {
        assert_eq!(TravelMode::Driving.profile(), "car");
        assert_eq!(TravelMode::Walking.profile(), "foot");
        assert_eq!(TravelMode::Cycling.profile(), "bike");
    }

    #[test]
    fn mode_round_trips_through_serde() {
        let json = serde_json::to_string(&TravelMode::Walking).unwrap();
        assert_eq!(json, "\"walking\"");
        let back: TravelMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TravelMode::Walking);
    }

    #[test]
    fn osrm_maneuvers_map_to_kinds() {
        assert_eq!(ManeuverKind::from_osrm("on ramp"), ManeuverKind::RampOn);
        assert_eq!(ManeuverKind::from_osrm("off ramp"), ManeuverKind::RampOff);
        assert_eq!(ManeuverKind::from_osrm("end of road"), ManeuverKind::EndOfRoad);
        assert_eq!(ManeuverKind::from_osrm("rotary"), ManeuverKind::Roundabout);
        assert_eq!(ManeuverKind::from_osrm("new name"), ManeuverKind::Continue);
        assert_eq!(ManeuverKind::from_osrm("notification"), ManeuverKind::Continue);
    }

    #[test]
    fn summary_formats_distance_and_duration() {
        let route = Route {
            path: vec![],
            distance_m: 1000.0,
            duration_s: 120.0,
            steps: vec![],
        };
        let summary = route.summary();
        assert_eq!(summary.distance, "1.0 km");
        assert_eq!(summary.duration, "2 min");
    }

    #[test]
    fn duration_rounds_up_partial_minutes() {
        assert_eq!(format_duration(0.0), "0 min");
        assert_eq!(format_duration(1.0), "1 min");
        assert_eq!(format_duration(3599.0), "60 min");
    }

    #[test]
    fn route_distance_rounds_to_tenth() {
        assert_eq!(format_route_distance(1249.0), "1.2 km");
        assert_eq!(format_route_distance(1250.1), "1.3 km");
        assert_eq!(format_step_distance(350.0), "350 m");
    }
}
