//! Persisted record types and preference keys.
//!
//! These types are the on-disk representation of user preferences and history.
//! They are kept separate from the transient session types in
//! [`crate::domain`] so the stored format can stay stable while the session
//! model evolves.

use crate::domain::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage keys used by the typed preference helpers.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const RECENT_SEARCHES: &str = "recent_searches";
    pub const THEME: &str = "theme";
    pub const LAST_LOCATION: &str = "last_location";
    pub const MAP_LAYER: &str = "map_layer";
    pub const TRAVEL_MODE: &str = "travel_mode";
    pub const ENTRY_SEQUENCE: &str = "entry_sequence";
}

/// Identifier of a favorite or recent entry. Unique and monotonic.
pub type EntryId = i64;

/// A place the user saved explicitly. Never evicted automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: EntryId,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: String,
    /// Unix timestamp (seconds) when the favorite was saved.
    pub created_at: i64,
}

/// A destination the user picked from search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: EntryId,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: String,
    /// Unix timestamp (seconds) of the most recent pick.
    pub timestamp: i64,
}

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Base map layer preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    #[default]
    Streets,
    Satellite,
    Terrain,
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Streets => "streets",
            Self::Satellite => "satellite",
            Self::Terrain => "terrain",
        })
    }
}

impl FromStr for MapLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "streets" | "street" => Ok(Self::Streets),
            "satellite" => Ok(Self::Satellite),
            "terrain" => Ok(Self::Terrain),
            other => Err(format!("unknown map layer: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggles_both_ways() {
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
    }

    #[test]
    fn favorite_serializes_with_nested_coordinate() {
        let entry = FavoriteEntry {
            id: 7,
            name: "Home".into(),
            coordinate: Coordinate::new(40.0, -74.0).unwrap(),
            address: "1 Main St".into(),
            created_at: 1_700_000_000,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["coordinate"]["lat"], 40.0);
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn layers_parse() {
        assert_eq!("Satellite".parse::<MapLayer>().unwrap(), MapLayer::Satellite);
        assert!("hybrid".parse::<MapLayer>().is_err());
        assert_eq!(MapLayer::Terrain.to_string(), "terrain");
    }
}
