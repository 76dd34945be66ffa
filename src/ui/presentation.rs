//! Presentation surface contract.
//!
//! The coordinator never reads UI state back. It only emits [`Notification`]s,
//! which the runtime hands to a [`PresentationSurface`] in emission order.

use crate::domain::{
    AccuracyTier, Coordinate, Destination, NearbyPlace, PlaceCategory, SearchResult, Step,
    TravelMode, UserLocation, Weather,
};
use crate::storage::{FavoriteEntry, MapLayer, RecentEntry, ThemePreference};

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// How long a toast of this severity stays up.
    #[must_use]
    pub const fn duration_ms(self) -> u64 {
        match self {
            Self::Info | Self::Success => 3000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

/// One-way render instruction from the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Transient message.
    Toast {
        message: String,
        severity: Severity,
        duration_ms: u64,
    },

    /// Blocking dialog with a title and explanatory body.
    Modal { title: String, body: String },

    /// User position marker with its accuracy tier.
    UserMarker {
        location: UserLocation,
        tier: AccuracyTier,
        /// The position came from storage, not from a live fix.
        fallback: bool,
    },

    DestinationMarker(Destination),

    /// Remove the destination marker.
    ClearDestination,

    /// Route polyline.
    RoutePath(Vec<Coordinate>),

    RouteSummary {
        distance: String,
        duration: String,
        mode: TravelMode,
    },

    /// Turn-by-turn instructions.
    TurnList(Vec<Step>),

    /// Remove the polyline, summary and turn list.
    ClearRoute,

    SearchResults(Vec<SearchResult>),

    NearbyResults {
        category: PlaceCategory,
        places: Vec<NearbyPlace>,
    },

    Favorites(Vec<FavoriteEntry>),
    Recent(Vec<RecentEntry>),

    /// Move the viewport.
    CenterMap(Coordinate),

    Weather(Weather),
    Theme(ThemePreference),
    MapLayer(MapLayer),
    TravelMode(TravelMode),
}

impl Notification {
    /// A toast with the severity's default duration.
    #[must_use]
    pub fn toast(message: impl Into<String>, severity: Severity) -> Self {
        Self::Toast {
            message: message.into(),
            severity,
            duration_ms: severity.duration_ms(),
        }
    }
}

/// Anything that can render notifications: a terminal, a GUI, a test recorder.
pub trait PresentationSurface {
    fn present(&mut self, notification: &Notification);
}
