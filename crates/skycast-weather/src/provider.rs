//! Current conditions and three-hour forecast samples from OpenWeatherMap.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;
use crate::forecast::aggregate;
use crate::http;
use crate::types::{ForecastResult, WeatherSample, WeatherSnapshot};

pub const WEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Units requested from the provider. Temperatures are °C, wind is m/s.
pub const UNITS: &str = "metric";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: CurrentMain,
    wind: Wind,
    weather: Vec<ConditionBlock>,
    visibility: u32,
    sys: Sys,
}

#[derive(Debug, Deserialize)]
struct SampleMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: SampleMain,
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

fn first_condition(weather: Vec<ConditionBlock>) -> Result<ConditionBlock, WeatherError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Parse("response has no weather condition".to_string()))
}

impl TryFrom<CurrentResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(resp: CurrentResponse) -> Result<Self, Self::Error> {
        let condition = first_condition(resp.weather)?;
        Ok(Self {
            temp: resp.main.temp,
            feels_like: resp.main.feels_like,
            temp_min: resp.main.temp_min,
            temp_max: resp.main.temp_max,
            humidity: resp.main.humidity,
            pressure: resp.main.pressure,
            wind_speed: resp.wind.speed,
            condition_text: condition.description,
            icon_code: condition.icon,
            visibility_meters: resp.visibility,
            sunrise: resp.sys.sunrise,
            sunset: resp.sys.sunset,
        })
    }
}

impl TryFrom<ForecastEntry> for WeatherSample {
    type Error = WeatherError;

    fn try_from(entry: ForecastEntry) -> Result<Self, Self::Error> {
        let condition = first_condition(entry.weather)?;
        Ok(Self {
            timestamp: entry.dt,
            temp_min: entry.main.temp_min,
            temp_max: entry.main.temp_max,
            condition_text: condition.description,
            icon_code: condition.icon,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherProvider {
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Self::with_options(
            WEATHER_API_BASE,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Current conditions at a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let resp: CurrentResponse = self.get("weather", lat, lon).await?;
        let snapshot = WeatherSnapshot::try_from(resp)?;
        tracing::info!("Current weather: {:.1}°C, {}", snapshot.temp, snapshot.condition_text);
        Ok(snapshot)
    }

    /// Raw three-hour samples, in provider order.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast_samples(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<WeatherSample>, WeatherError> {
        let resp: ForecastResponse = self.get("forecast", lat, lon).await?;
        let samples = resp
            .list
            .into_iter()
            .map(WeatherSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("Fetched {} forecast samples", samples.len());
        Ok(samples)
    }

    /// Forecast samples folded into daily summaries.
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastResult, WeatherError> {
        let samples = self.fetch_forecast_samples(lat, lon).await?;
        Ok(aggregate(&samples))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        lat: f64,
        lon: f64,
    ) -> Result<T, WeatherError> {
        let api_key = http::require_key(self.api_key.as_deref())?;
        let url = format!("{}/{}", self.base_url, endpoint);
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", UNITS),
                ("appid", api_key),
            ])
            .send()
            .await?;

        http::handle_response(response).await
    }
}
