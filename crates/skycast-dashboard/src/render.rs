//! Plain-text rendering of the dashboard.
//!
//! Temperatures are rounded to whole degrees. Dates and times are shown in
//! UTC, matching how forecast days are grouped.

use chrono::DateTime;
use skycast_weather::{DailySummary, FavoritesSet, Location, WeatherSnapshot};

use crate::controller::DashboardState;

const EMPTY_FAVORITES_HINT: &str = "You haven't added any favorite locations yet. \
Search for a city and toggle it to add it to your favorites.";

fn degrees(value: f64) -> String {
    format!("{}°", value.round() as i64)
}

fn clock(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Current conditions card for `location`.
pub fn weather_card(location: &Location, weather: &WeatherSnapshot, is_favorite: bool) -> String {
    let star = if is_favorite { "★" } else { "☆" };
    let category = weather.icon_category();

    [
        format!("{} {}", star, location.name()),
        format!(
            "{} [{}]  {}",
            degrees(weather.temp),
            category.icon_name(),
            weather.condition_text
        ),
        format!("Feels like: {}", degrees(weather.feels_like)),
        format!(
            "Min: {} | Max: {}",
            degrees(weather.temp_min),
            degrees(weather.temp_max)
        ),
        format!("Humidity: {}%", weather.humidity),
        format!("Wind: {} m/s", weather.wind_speed),
        format!("Pressure: {} hPa", weather.pressure),
        format!("Visibility: {:.1} km", weather.visibility_km()),
        format!("Sunrise: {}", clock(weather.sunrise)),
        format!("Sunset: {}", clock(weather.sunset)),
    ]
    .join("\n")
}

/// One line per forecast day, e.g. `Mon 3 Jun   11° / 16°  clear sky`.
pub fn forecast_lines(days: &[DailySummary]) -> String {
    days.iter()
        .map(|day| {
            format!(
                "{:<10} {:>4} / {:<4} {}",
                day.day().format("%a %-d %b").to_string(),
                degrees(day.temp_min),
                degrees(day.temp_max),
                day.condition_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered favorites list, starting at 1.
pub fn favorites_list(favorites: &FavoritesSet) -> String {
    if favorites.is_empty() {
        return EMPTY_FAVORITES_HINT.to_string();
    }

    favorites
        .iter()
        .enumerate()
        .map(|(i, loc)| format!("{:>2}. {}", i + 1, loc))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full dashboard: current card followed by the forecast.
pub fn dashboard(state: &DashboardState, is_favorite: bool) -> String {
    if state.loading {
        return "Loading...".to_string();
    }

    let mut sections = Vec::new();

    if let (Some(location), Some(weather)) = (&state.current_location, &state.current_weather) {
        sections.push(weather_card(location, weather, is_favorite));
    }

    if let Some(forecast) = state.forecast.as_deref().filter(|f| !f.is_empty()) {
        sections.push(format!("5-Day Forecast\n{}", forecast_lines(forecast)));
    }

    sections.join("\n\n")
}
