use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::day_key;

/// Weather categories mapped from OpenWeatherMap icon codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
}

impl IconCategory {
    /// Convert a provider icon code (`"01d"`, `"10n"`, ...) to a category.
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_icon_code(code: &str) -> Self {
        match code {
            "01d" | "01n" => Self::Clear,
            "02d" | "02n" => Self::PartlyCloudy,
            "03d" | "03n" | "04d" | "04n" => Self::Cloudy,
            "09d" | "09n" => Self::Drizzle,
            "10d" | "10n" => Self::Rain,
            "11d" | "11n" => Self::Thunderstorm,
            "13d" | "13n" => Self::Snow,
            "50d" | "50n" => Self::Fog,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
        }
    }

    /// Glyph name used by the renderer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Drizzle => "cloud_drizzle",
            Self::Rain => "cloud_rain",
            Self::Thunderstorm => "cloud_lightning",
            Self::Snow => "cloud_snow",
            Self::Fog => "cloud_fog",
        }
    }
}

/// Background colour family for a weather card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    Sky,
    Overcast,
    Rain,
    Storm,
    Snow,
    Mist,
}

impl Backdrop {
    /// Pick a colour family by the code group an icon code contains.
    ///
    /// Unlike [`IconCategory::from_icon_code`] this is a substring match, so
    /// a bare `"10"` still reads as rain. Groups are checked in order.
    pub fn from_icon_code(code: &str) -> Self {
        const GROUPS: [(&[&str], Backdrop); 6] = [
            (&["01", "02"], Backdrop::Sky),
            (&["03", "04"], Backdrop::Overcast),
            (&["09", "10"], Backdrop::Rain),
            (&["11"], Backdrop::Storm),
            (&["13"], Backdrop::Snow),
            (&["50"], Backdrop::Mist),
        ];

        GROUPS
            .iter()
            .find(|(groups, _)| groups.iter().any(|g| code.contains(g)))
            .map_or(Backdrop::Sky, |(_, backdrop)| *backdrop)
    }
}

/// A named geographic location.
///
/// Two locations are equal only when name, latitude and longitude all match
/// exactly. Coordinates are not rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    name: String,
    lat: f64,
    lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.4}, {:.4})", self.name, self.lat, self.lon)
    }
}

/// One raw three-hour forecast reading from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub timestamp: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition_text: String,
    pub icon_code: String,
}

/// Aggregated forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Timestamp of the first sample seen for this day
    pub date: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition_text: String,
    pub icon_code: String,
}

impl DailySummary {
    /// Start a summary from the first sample of a day.
    pub fn seed(sample: &WeatherSample) -> Self {
        Self {
            date: sample.timestamp,
            temp_min: sample.temp_min,
            temp_max: sample.temp_max,
            condition_text: sample.condition_text.clone(),
            icon_code: sample.icon_code.clone(),
        }
    }

    /// Widen the temperature range with another sample of the same day.
    /// Description and icon stay with the seeding sample.
    pub fn absorb(&mut self, sample: &WeatherSample) {
        self.temp_min = self.temp_min.min(sample.temp_min);
        self.temp_max = self.temp_max.max(sample.temp_max);
    }

    /// Calendar day this summary covers (UTC)
    pub fn day(&self) -> NaiveDate {
        day_key(self.date)
    }

    pub fn icon_category(&self) -> IconCategory {
        IconCategory::from_icon_code(&self.icon_code)
    }
}

/// Daily summaries, first day first, at most [`crate::MAX_FORECAST_DAYS`] long
pub type ForecastResult = Vec<DailySummary>;

/// Current conditions for a coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    pub condition_text: String,
    pub icon_code: String,
    pub visibility_meters: u32,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherSnapshot {
    pub fn icon_category(&self) -> IconCategory {
        IconCategory::from_icon_code(&self.icon_code)
    }

    pub fn backdrop(&self) -> Backdrop {
        Backdrop::from_icon_code(&self.icon_code)
    }

    pub fn visibility_km(&self) -> f64 {
        f64::from(self.visibility_meters) / 1000.0
    }

    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise, 0)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_code_clear() {
        assert_eq!(IconCategory::from_icon_code("01d"), IconCategory::Clear);
        assert_eq!(IconCategory::from_icon_code("01n"), IconCategory::Clear);
    }

    #[test]
    fn test_icon_code_clouds() {
        assert_eq!(IconCategory::from_icon_code("02n"), IconCategory::PartlyCloudy);
        assert_eq!(IconCategory::from_icon_code("03d"), IconCategory::Cloudy);
        assert_eq!(IconCategory::from_icon_code("04n"), IconCategory::Cloudy);
    }

    #[test]
    fn test_icon_code_precipitation() {
        assert_eq!(IconCategory::from_icon_code("09d"), IconCategory::Drizzle);
        assert_eq!(IconCategory::from_icon_code("10n"), IconCategory::Rain);
        assert_eq!(IconCategory::from_icon_code("11d"), IconCategory::Thunderstorm);
        assert_eq!(IconCategory::from_icon_code("13n"), IconCategory::Snow);
        assert_eq!(IconCategory::from_icon_code("50d"), IconCategory::Fog);
    }

    #[test]
    fn test_icon_code_unknown_defaults_to_clear() {
        assert_eq!(IconCategory::from_icon_code(""), IconCategory::Clear);
        assert_eq!(IconCategory::from_icon_code("99x"), IconCategory::Clear);
        assert_eq!(IconCategory::from_icon_code("10"), IconCategory::Clear);
    }

    #[test]
    fn test_backdrop_groups() {
        assert_eq!(Backdrop::from_icon_code("02n"), Backdrop::Sky);
        assert_eq!(Backdrop::from_icon_code("04d"), Backdrop::Overcast);
        assert_eq!(Backdrop::from_icon_code("09d"), Backdrop::Rain);
        assert_eq!(Backdrop::from_icon_code("11n"), Backdrop::Storm);
        assert_eq!(Backdrop::from_icon_code("13d"), Backdrop::Snow);
        assert_eq!(Backdrop::from_icon_code("50n"), Backdrop::Mist);
        assert_eq!(Backdrop::from_icon_code("99x"), Backdrop::Sky);
    }

    #[test]
    fn test_backdrop_matches_partial_codes() {
        // Bare groups fall back to Clear as a category but keep their colour.
        assert_eq!(IconCategory::from_icon_code("10"), IconCategory::Clear);
        assert_eq!(Backdrop::from_icon_code("10"), Backdrop::Rain);
        assert_eq!(Backdrop::from_icon_code("x13"), Backdrop::Snow);
        // Earlier groups win when a code contains two.
        assert_eq!(Backdrop::from_icon_code("0150"), Backdrop::Sky);
    }

    #[test]
    fn test_location_equality_is_exact() {
        let a = Location::new("Paris", 48.8566, 2.3522);
        assert_eq!(a, Location::new("Paris", 48.8566, 2.3522));
        assert_ne!(a, Location::new("Paris", 48.85660001, 2.3522));
        assert_ne!(a, Location::new("Paris, FR", 48.8566, 2.3522));
    }

    #[test]
    fn test_location_wire_shape() {
        let json = serde_json::to_value(Location::new("Oslo", 59.91, 10.75)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Oslo", "lat": 59.91, "lon": 10.75 })
        );
    }

    #[test]
    fn test_summary_absorb_keeps_description() {
        let first = WeatherSample {
            timestamp: 100,
            temp_min: 10.0,
            temp_max: 20.0,
            condition_text: "clear sky".into(),
            icon_code: "01d".into(),
        };
        let later = WeatherSample {
            timestamp: 200,
            temp_min: 5.0,
            temp_max: 15.0,
            condition_text: "light rain".into(),
            icon_code: "10d".into(),
        };

        let mut summary = DailySummary::seed(&first);
        summary.absorb(&later);

        assert_eq!(summary.date, 100);
        assert_eq!(summary.temp_min, 5.0);
        assert_eq!(summary.temp_max, 20.0);
        assert_eq!(summary.condition_text, "clear sky");
        assert_eq!(summary.icon_category(), IconCategory::Clear);
    }

    #[test]
    fn test_snapshot_visibility_km() {
        let snapshot = WeatherSnapshot {
            temp: 12.3,
            feels_like: 11.0,
            temp_min: 10.0,
            temp_max: 14.0,
            humidity: 70,
            pressure: 1013.0,
            wind_speed: 3.6,
            condition_text: "few clouds".into(),
            icon_code: "02d".into(),
            visibility_meters: 8500,
            sunrise: 1_717_390_000,
            sunset: 1_717_450_000,
        };
        assert!((snapshot.visibility_km() - 8.5).abs() < f64::EPSILON);
        assert!(snapshot.sunrise_at().is_some());
        assert_eq!(snapshot.icon_category(), IconCategory::PartlyCloudy);
        assert_eq!(snapshot.backdrop(), Backdrop::Sky);
    }
}
