//! Current-weather adapter (Open-Meteo forecast API).
//!
//! Weather is auxiliary: callers treat every failure as silently ignorable.

use super::http::normalize_base_url;
use crate::domain::{Coordinate, ServiceError, Weather};
use futures_util::future::BoxFuture;
use serde::Deserialize;

pub trait WeatherService: Send + Sync {
    fn current(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<Weather, ServiceError>>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u16,
}

impl WeatherService for OpenMeteoClient {
    fn current(&self, coordinate: Coordinate) -> BoxFuture<'_, Result<Weather, ServiceError>> {
        Box::pin(async move {
            let url = format!("{}/v1/forecast", self.base_url);
            let forecast: ForecastResponse = self
                .client
                .get(&url)
                .query(&[
                    ("latitude", coordinate.lat.to_string()),
                    ("longitude", coordinate.lng.to_string()),
                    ("current_weather", "true".to_string()),
                ])
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| ServiceError::from_reqwest(&e))?
                .json()
                .await
                .map_err(|e| ServiceError::from_reqwest(&e))?;

            parse_forecast(forecast)
        })
    }
}

fn parse_forecast(forecast: ForecastResponse) -> Result<Weather, ServiceError> {
    forecast
        .current_weather
        .map(|current| Weather {
            temperature_c: current.temperature,
            code: current.weathercode,
        })
        .ok_or(ServiceError::EmptyResult)
}
