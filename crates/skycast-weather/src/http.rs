//! Shared plumbing for the OpenWeatherMap endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::WeatherError;

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

pub(crate) fn require_key(api_key: Option<&str>) -> Result<&str, WeatherError> {
    api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(WeatherError::MissingApiKey)
}

/// Turn a provider response into `T`, or a status error for non-2xx.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e.without_url())))
    } else {
        let message = response.text().await.unwrap_or_default();
        tracing::debug!("Provider returned {}: {}", status, message);
        Err(WeatherError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
