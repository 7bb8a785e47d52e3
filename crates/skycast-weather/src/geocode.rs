//! Forward geocoding: turn a city name into a named coordinate pair.
//! Uses the OpenWeatherMap direct geocoding endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{LocationError, WeatherError};
use crate::http;
use crate::types::Location;

pub const GEO_API_BASE: &str = "https://api.openweathermap.org/geo/1.0";

/// Name given to device-reported positions.
pub const CURRENT_LOCATION_NAME: &str = "Current Location";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct GeoMatch {
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LocationResolver {
    pub fn new(api_key: Option<String>) -> Result<Self, WeatherError> {
        Self::with_options(
            GEO_API_BASE,
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

    /// Look up `query`, returning the best match or `None` if nothing matched.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, query: &str) -> Result<Option<Location>, LocationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LocationError::EmptyQuery);
        }

        let api_key = http::require_key(self.api_key.as_deref())?;
        let url = format!("{}/direct", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", "1"), ("appid", api_key)])
            .send()
            .await
            .map_err(WeatherError::from)?;

        let matches: Vec<GeoMatch> = http::handle_response(response).await?;

        let location = matches
            .into_iter()
            .next()
            .map(|m| Location::new(m.name, m.lat, m.lon));

        match &location {
            Some(loc) => tracing::info!("Resolved {:?} to {}", query, loc),
            None => tracing::info!("No location matched {:?}", query),
        }
        Ok(location)
    }

    /// Wrap a device-reported position. No lookup is performed.
    pub fn from_coordinates(lat: f64, lon: f64) -> Location {
        Location::new(CURRENT_LOCATION_NAME, lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> LocationResolver {
        LocationResolver::with_options(
            &server.uri(),
            Some("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_first_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("q", "Berlin"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Berlin", "lat": 52.5170365, "lon": 13.3888599, "country": "DE"},
                {"name": "Berlin", "lat": 44.4686, "lon": -71.1851, "country": "US"}
            ])))
            .mount(&mock_server)
            .await;

        let location = resolver(&mock_server).resolve("  Berlin ").await.unwrap();
        assert_eq!(location, Some(Location::new("Berlin", 52.5170365, 13.3888599)));
    }

    #[tokio::test]
    async fn test_resolve_no_match_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let location = resolver(&mock_server).resolve("Atlantis").await.unwrap();
        assert!(location.is_none());
    }

    #[tokio::test]
    async fn test_resolve_server_error_is_transport() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server).resolve("Berlin").await;
        assert!(matches!(
            result,
            Err(LocationError::Transport(WeatherError::Status { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_query_skips_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = resolver(&mock_server).resolve("   ").await;
        assert!(matches!(result, Err(LocationError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let resolver = LocationResolver::new(None).unwrap();
        let result = resolver.resolve("Berlin").await;
        assert!(matches!(
            result,
            Err(LocationError::Transport(WeatherError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_network_error_hides_api_key() {
        let resolver = LocationResolver::with_options(
            "http://127.0.0.1:1",
            Some("SECRETKEY123".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = resolver.resolve("Berlin").await.unwrap_err();
        assert!(matches!(
            err,
            LocationError::Transport(WeatherError::Network(_))
        ));
        assert!(!err.to_string().contains("SECRETKEY123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRETKEY123"));
    }

    #[test]
    fn test_from_coordinates() {
        let location = LocationResolver::from_coordinates(40.7128, -74.006);
        assert_eq!(location.name(), CURRENT_LOCATION_NAME);
        assert_eq!(location.lat(), 40.7128);
        assert_eq!(location.lon(), -74.006);
    }
}
