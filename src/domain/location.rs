//! User position and destination models.

use super::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accuracy below this radius (meters) is reported as [`AccuracyTier::High`].
const HIGH_ACCURACY_M: f64 = 20.0;

/// Accuracy below this radius (meters) is reported as [`AccuracyTier::Medium`].
const MEDIUM_ACCURACY_M: f64 = 100.0;

/// A single geolocation reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    /// Radius of uncertainty in meters.
    pub accuracy_m: f64,
}

/// The user's last known position.
///
/// Every update replaces the previous value wholesale; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinate: Coordinate,
    pub accuracy_m: f64,
    /// Unix timestamp (seconds) when the fix was taken.
    pub captured_at: i64,
}

impl UserLocation {
    /// Stamps a fix with the current time.
    #[must_use]
    pub fn from_fix(fix: Fix) -> Self {
        Self {
            coordinate: fix.coordinate,
            accuracy_m: fix.accuracy_m.max(0.0),
            captured_at: chrono::Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn accuracy_tier(&self) -> AccuracyTier {
        AccuracyTier::from_meters(self.accuracy_m)
    }
}

/// Coarse accuracy bucket shown next to the user marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTier {
    High,
    Medium,
    Low,
}

impl AccuracyTier {
    /// Buckets an accuracy radius: `high` under 20 m, `medium` under 100 m,
    /// `low` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfinder::domain::AccuracyTier;
    ///
    /// assert_eq!(AccuracyTier::from_meters(5.0), AccuracyTier::High);
    /// assert_eq!(AccuracyTier::from_meters(20.0), AccuracyTier::Medium);
    /// assert_eq!(AccuracyTier::from_meters(250.0), AccuracyTier::Low);
    /// ```
    #[must_use]
    pub fn from_meters(accuracy_m: f64) -> Self {
        if accuracy_m < HIGH_ACCURACY_M {
            Self::High
        } else if accuracy_m < MEDIUM_ACCURACY_M {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Where the user wants to go. At most one is active per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub coordinate: Coordinate,
    pub display_name: String,
}

impl Destination {
    /// Creates a destination, naming it after its coordinates when no name
    /// is supplied.
    #[must_use]
    pub fn new(coordinate: Coordinate, display_name: Option<String>) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| coordinate.to_string());
        Self {
            coordinate,
            display_name,
        }
    }
}

/// Options passed to the geolocation source for a fix or a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// Give up if no fix arrives within this window.
    pub timeout: Duration,
    /// Accept a cached fix no older than this.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// One-shot fix: high accuracy, 10 s timeout, no cached fixes.
    #[must_use]
    pub const fn one_shot() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }

    /// Continuous tracking: high accuracy, 10 s timeout, 5 s staleness.
    #[must_use]
    pub const fn tracking() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(AccuracyTier::from_meters(0.0), AccuracyTier::High);
        assert_eq!(AccuracyTier::from_meters(19.99), AccuracyTier::High);
        assert_eq!(AccuracyTier::from_meters(99.99), AccuracyTier::Medium);
        assert_eq!(AccuracyTier::from_meters(100.0), AccuracyTier::Low);
    }

    #[test]
    fn destination_falls_back_to_coordinates() {
        let c = Coordinate::new(51.5074, -0.1278).unwrap();
        assert_eq!(Destination::new(c, None).display_name, "51.50740, -0.12780");
        assert_eq!(
            Destination::new(c, Some("  ".into())).display_name,
            "51.50740, -0.12780"
        );
        assert_eq!(Destination::new(c, Some("London".into())).display_name, "London");
    }

    #[test]
    fn negative_accuracy_is_clamped() {
        let fix = Fix {
            coordinate: Coordinate::new(0.0, 0.0).unwrap(),
            accuracy_m: -3.0,
        };
        assert!(UserLocation::from_fix(fix).accuracy_m.abs() < f64::EPSILON);
    }

    #[test]
    fn option_presets() {
        assert_eq!(PositionOptions::one_shot().maximum_age, Duration::ZERO);
        assert_eq!(PositionOptions::tracking().maximum_age, Duration::from_secs(5));
        assert_eq!(PositionOptions::tracking().timeout, Duration::from_secs(10));
    }
}
