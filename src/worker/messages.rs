//! Request and response protocol between the coordinator and the worker.
//!
//! Every request the coordinator issues carries a [`RequestId`]. The matching
//! response echoes it back, which is how the coordinator recognises and drops
//! answers to requests it has since superseded.

use crate::domain::{
    BoundingBox, Coordinate, Fix, LocationErrorKind, Place, PlaceCategory, PositionOptions, Route,
    SearchResult, ServiceError, Weather,
};
use std::fmt;

/// Identifier of one issued request. Allocated monotonically per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a location tracking subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A call the worker should make to an external collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    /// One-shot position fix.
    LocationFix {
        id: RequestId,
        options: PositionOptions,
    },

    Route {
        id: RequestId,
        /// Routing profile (`car`, `foot`, `bike`).
        profile: String,
        from: Coordinate,
        to: Coordinate,
    },

    /// Forward search, optionally biased towards a box.
    Search {
        id: RequestId,
        query: String,
        bias: Option<BoundingBox>,
    },

    ReverseGeocode {
        id: RequestId,
        coordinate: Coordinate,
    },

    /// Category search around `center`.
    Nearby {
        id: RequestId,
        category: PlaceCategory,
        center: Coordinate,
        bounds: BoundingBox,
    },

    Weather {
        id: RequestId,
        coordinate: Coordinate,
    },
}

impl ServiceRequest {
    #[must_use]
    pub const fn id(&self) -> RequestId {
        match self {
            Self::LocationFix { id, .. }
            | Self::Route { id, .. }
            | Self::Search { id, .. }
            | Self::ReverseGeocode { id, .. }
            | Self::Nearby { id, .. }
            | Self::Weather { id, .. } => *id,
        }
    }

    /// Short name for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LocationFix { .. } => "location_fix",
            Self::Route { .. } => "route",
            Self::Search { .. } => "search",
            Self::ReverseGeocode { .. } => "reverse_geocode",
            Self::Nearby { .. } => "nearby",
            Self::Weather { .. } => "weather",
        }
    }
}

/// The settled outcome of a [`ServiceRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    LocationFix {
        id: RequestId,
        result: Result<Fix, LocationErrorKind>,
    },

    Route {
        id: RequestId,
        result: Result<Route, ServiceError>,
    },

    Search {
        id: RequestId,
        result: Result<Vec<SearchResult>, ServiceError>,
    },

    ReverseGeocode {
        id: RequestId,
        result: Result<String, ServiceError>,
    },

    Nearby {
        id: RequestId,
        category: PlaceCategory,
        center: Coordinate,
        result: Result<Vec<Place>, ServiceError>,
    },

    Weather {
        id: RequestId,
        result: Result<Weather, ServiceError>,
    },
}

impl ServiceResponse {
    #[must_use]
    pub const fn id(&self) -> RequestId {
        match self {
            Self::LocationFix { id, .. }
            | Self::Route { id, .. }
            | Self::Search { id, .. }
            | Self::ReverseGeocode { id, .. }
            | Self::Nearby { id, .. }
            | Self::Weather { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_exposed_uniformly() {
        let c = Coordinate::new(1.0, 2.0).unwrap();
        let requests = [
            ServiceRequest::LocationFix { id: RequestId(1), options: PositionOptions::one_shot() },
            ServiceRequest::Route { id: RequestId(2), profile: "car".into(), from: c, to: c },
            ServiceRequest::Weather { id: RequestId(3), coordinate: c },
        ];
        let ids: Vec<u64> = requests.iter().map(|r| r.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(requests[1].kind(), "route");
    }

    #[test]
    fn ids_display_compactly() {
        assert_eq!(RequestId(7).to_string(), "#7");
        assert_eq!(SubscriptionId(2).to_string(), "sub-2");
    }
}
