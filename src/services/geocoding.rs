//! Geocoding adapter (Nominatim HTTP API).
//!
//! Covers the three lookups the coordinator needs: forward search with an
//! optional bounding-box bias, reverse geocoding of a single coordinate, and
//! category search restricted to a box.

use super::http::normalize_base_url;
use crate::domain::{
    short_place_name, BoundingBox, Coordinate, Place, PlaceCategory, SearchResult, ServiceError,
    MAX_NEARBY_RESULTS, MAX_SEARCH_RESULTS,
};
use futures_util::future::BoxFuture;
use serde::Deserialize;

/// Forward, reverse and category geocoding.
pub trait GeocodingService: Send + Sync {
    /// Free-text search, ranked by the geocoder. At most five results.
    fn search<'a>(
        &'a self,
        query: &'a str,
        bias: Option<BoundingBox>,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, ServiceError>>;

    /// Human-readable name for a coordinate.
    fn reverse(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<String, ServiceError>>;

    /// Places of `category` inside `bounds`. At most ten results.
    fn category(
        &self,
        category: PlaceCategory,
        bounds: BoundingBox,
    ) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>>;
}

/// HTTP client for a Nominatim server.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(url = %url, params = ?params, "requesting geocoder");

        self.client
            .get(&url)
            .query(params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ServiceError::from_reqwest(&e))?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::from_reqwest(&e))
    }
}

/// Query parameters for a forward search.
///
/// `bias` only prefers results inside the box; places outside it are still
/// returned.
#[must_use]
pub fn search_params(query: &str, bias: Option<BoundingBox>, limit: usize) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_string()),
        ("format", "json".to_string()),
        ("limit", limit.to_string()),
        ("addressdetails", "1".to_string()),
    ];
    if let Some(bbox) = bias {
        params.push(("viewbox", bbox.to_viewbox()));
    }
    params
}

/// Query parameters for a category search restricted to `bounds`.
#[must_use]
pub fn category_params(tag: &str, bounds: BoundingBox, limit: usize) -> Vec<(&'static str, String)> {
    let mut params = search_params(tag, Some(bounds), limit);
    params.push(("bounded", "1".to_string()));
    params
}

impl GeocodingService for NominatimClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
        bias: Option<BoundingBox>,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, ServiceError>> {
        Box::pin(async move {
            let params = search_params(query, bias, MAX_SEARCH_RESULTS);
            let hits: Vec<NominatimPlace> = self.get_json("search", &params).await?;
            Ok(to_search_results(hits))
        })
    }

    fn reverse(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<String, ServiceError>> {
        Box::pin(async move {
            let params = [
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lng.to_string()),
                ("format", "json".to_string()),
            ];
            let reverse: NominatimReverse = self.get_json("reverse", &params).await?;
            parse_reverse(reverse)
        })
    }

    fn category(
        &self,
        category: PlaceCategory,
        bounds: BoundingBox,
    ) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>> {
        Box::pin(async move {
            let params = category_params(category.geocoder_tag(), bounds, MAX_NEARBY_RESULTS);
            let hits: Vec<NominatimPlace> = self.get_json("search", &params).await?;
            Ok(to_places(hits))
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    name: Option<String>,
}

impl NominatimPlace {
    fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.parse().ok()?;
        let lng = self.lon.parse().ok()?;
        Coordinate::new(lat, lng)
    }

    /// The explicit name, else the first component of the display name.
    fn short_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map_or_else(|| short_place_name(&self.display_name), str::to_string)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimReverse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Converts raw hits, dropping entries with unparseable coordinates.
pub(crate) fn to_search_results(hits: Vec<NominatimPlace>) -> Vec<SearchResult> {
    hits.into_iter()
        .filter_map(|hit| {
            let coordinate = hit.coordinate()?;
            Some(SearchResult {
                coordinate,
                display_name: hit.short_name(),
                raw_address: hit.display_name,
            })
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

pub(crate) fn to_places(hits: Vec<NominatimPlace>) -> Vec<Place> {
    hits.into_iter()
        .filter_map(|hit| {
            let coordinate = hit.coordinate()?;
            Some(Place {
                coordinate,
                display_name: hit.short_name(),
            })
        })
        .take(MAX_NEARBY_RESULTS)
        .collect()
}

pub(crate) fn parse_reverse(reverse: NominatimReverse) -> Result<String, ServiceError> {
    if let Some(error) = reverse.error {
        return Err(ServiceError::Status(error));
    }
    reverse
        .display_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ServiceError::EmptyResult)
}
