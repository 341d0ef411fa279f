//! Open-Meteo geocoding + current weather

use crate::error::ClientResult;
use serde::Deserialize;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";
pub const FORECAST_URL: &str = "https://api.open-meteo.com";

/// Current weather for a resolved place
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub timezone: String,
    /// Value with unit, e.g. `21.3°C`
    pub temperature: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    country_code: Option<String>,
    admin1: Option<String>,
    admin2: Option<String>,
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    timezone: String,
    current: CurrentValues,
    current_units: CurrentUnits,
}

#[derive(Debug, Deserialize)]
struct CurrentValues {
    temperature_2m: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    temperature_2m: String,
}

/// Open-Meteo client
#[derive(Clone)]
pub struct WeatherApi {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_urls(client, GEOCODING_URL, FORECAST_URL)
    }

    pub fn with_base_urls(
        client: reqwest::Client,
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        }
    }

    /// Resolve `location` and fetch its current temperature
    ///
    /// Returns `None` when the location is unknown.
    pub async fn lookup(&self, location: &str) -> ClientResult<Option<WeatherReport>> {
        tracing::info!("Looking up weather for {:?}", location);

        let geocoding: GeocodingResponse = self
            .client
            .get(format!("{}/v1/search", self.geocoding_url))
            .query(&[("name", location), ("count", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = geocoding.results.into_iter().next() else {
            return Ok(None);
        };

        let forecast: Forecast = self
            .client
            .get(format!("{}/v1/forecast", self.forecast_url))
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current", "temperature_2m".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Some(WeatherReport {
            country: place.country,
            country_code: place.country_code,
            region: place.admin1,
            subregion: place.admin2,
            population: place.population,
            timezone: forecast.timezone,
            temperature: format!(
                "{}{}",
                format_number(forecast.current.temperature_2m),
                forecast.current_units.temperature_2m
            ),
        }))
    }
}

/// Whole numbers keep one decimal (`21.0`), others print as-is
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
