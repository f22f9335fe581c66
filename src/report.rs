//! Typed payloads for the three endpoints
//!
//! Each mode has its own schema. A body is decoded against the schema of the
//! mode that was active when the request was issued, so a mismatch surfaces
//! once as a decode error instead of as missing fields at render time.

use chrono::DateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::QueryMode;

/// Result of a successful request, tagged with the mode it was issued for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WeatherReport {
    Current(CurrentWeather),
    Coordinates(CoordinatesWeather),
    Forecast(ForecastReport),
}

impl WeatherReport {
    /// Decode a JSON body against the schema for `mode`
    pub fn from_value(mode: QueryMode, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match mode {
            QueryMode::Current => WeatherReport::Current(serde_json::from_value(value)?),
            QueryMode::Coordinates => WeatherReport::Coordinates(serde_json::from_value(value)?),
            QueryMode::Forecast => WeatherReport::Forecast(serde_json::from_value(value)?),
        })
    }

    pub fn mode(&self) -> QueryMode {
        match self {
            WeatherReport::Current(_) => QueryMode::Current,
            WeatherReport::Coordinates(_) => QueryMode::Coordinates,
            WeatherReport::Forecast(_) => QueryMode::Forecast,
        }
    }
}

// ============================================================================
// /weather
// ============================================================================

/// Flat, pre-formatted fields from `/weather`. Values are shown verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentWeather {
    #[serde(rename = "Temperature")]
    pub temperature: String,
    #[serde(rename = "Humidity")]
    pub humidity: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Atmospheric Pressure", default)]
    pub pressure: Option<String>,
}

// ============================================================================
// /weather_by_coords
// ============================================================================

/// OpenWeatherMap-style payload passed through by `/weather_by_coords`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoordinatesWeather {
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub sys: Option<SysInfo>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Option<Wind>,
}

impl CoordinatesWeather {
    /// "Name, CC", or just the name when the country is missing
    pub fn location(&self) -> String {
        match self.sys.as_ref().and_then(|sys| sys.country.as_deref()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
}

/// Temperatures are in Kelvin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

impl Condition {
    pub fn summary(&self) -> String {
        if self.description.is_empty() {
            self.main.clone()
        } else {
            format!("{} - {}", self.main, self.description)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

// ============================================================================
// /forecast
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastReport {
    pub city: ForecastCity,
    #[serde(default)]
    pub country: Option<String>,
    pub forecast: Vec<ForecastEntry>,
}

impl ForecastReport {
    /// Heading location, preferring the top-level country the service adds
    pub fn location(&self) -> String {
        match self.country.as_deref().or(self.city.country.as_deref()) {
            Some(country) => format!("{}, {}", self.city.name, country),
            None => self.city.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// One 3-hour slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastEntry {
    /// Unix seconds
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    /// Probability of precipitation, 0.0..=1.0
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub wind: Option<Wind>,
}

impl ForecastEntry {
    /// Timestamp in UTC, e.g. `2024-05-01 12:00 UTC`
    pub fn timestamp_label(&self) -> String {
        match DateTime::from_timestamp(self.dt, 0) {
            Some(time) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => format!("@{}", self.dt),
        }
    }

    /// Chance of rain as a whole percentage, only when the service reports one above zero
    pub fn rain_chance(&self) -> Option<i64> {
        self.pop
            .filter(|pop| *pop > 0.0)
            .map(|pop| (pop * 100.0).round() as i64)
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_uses_backend_field_names() {
        let value = json!({
            "Temperature": "12.3 C",
            "Humidity": "81%",
            "Description": "Light rain",
            "Atmospheric Pressure": "1012 hPa"
        });

        let report = WeatherReport::from_value(QueryMode::Current, value).unwrap();
        let WeatherReport::Current(current) = report else {
            panic!("expected current report");
        };
        assert_eq!(current.temperature, "12.3 C");
        assert_eq!(current.pressure.as_deref(), Some("1012 hPa"));
    }

    #[test]
    fn test_coordinates_missing_feels_like_is_rejected() {
        let value = json!({
            "name": "Paris",
            "main": { "temp": 290.0, "humidity": 40 }
        });

        assert!(WeatherReport::from_value(QueryMode::Coordinates, value).is_err());
    }

    #[test]
    fn test_coordinates_optional_sections_default() {
        let value = json!({
            "name": "Paris",
            "main": { "temp": 290.0, "feels_like": 289.0, "humidity": 40 }
        });

        let report = WeatherReport::from_value(QueryMode::Coordinates, value).unwrap();
        let WeatherReport::Coordinates(coords) = report else {
            panic!("expected coordinates report");
        };
        assert_eq!(coords.location(), "Paris");
        assert!(coords.condition().is_none());
        assert!(coords.wind.is_none());
        assert!(coords.main.pressure.is_none());
    }

    #[test]
    fn test_shape_is_checked_against_request_mode() {
        let current = json!({
            "Temperature": "12.3 C",
            "Humidity": "81%",
            "Description": "Light rain"
        });

        assert!(WeatherReport::from_value(QueryMode::Forecast, current).is_err());
    }

    #[test]
    fn test_forecast_entry_labels() {
        let entry = ForecastEntry {
            dt: 1_714_564_800,
            main: MainReadings {
                temp: 280.0,
                feels_like: 278.0,
                humidity: 70.0,
                pressure: None,
            },
            weather: Vec::new(),
            pop: Some(0.256),
            wind: None,
        };

        assert_eq!(entry.timestamp_label(), "2024-05-01 12:00 UTC");
        assert_eq!(entry.rain_chance(), Some(26));
    }

    #[test]
    fn test_zero_pop_hides_rain_chance() {
        let value = json!({
            "dt": 0,
            "main": { "temp": 280.0, "feels_like": 278.0, "humidity": 70 },
            "pop": 0
        });
        let entry: ForecastEntry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.rain_chance(), None);
    }

    #[test]
    fn test_forecast_location_prefers_top_level_country() {
        let value = json!({
            "city": { "name": "Lyon", "country": "XX" },
            "country": "FR",
            "forecast": []
        });

        let report: ForecastReport = serde_json::from_value(value).unwrap();
        assert_eq!(report.location(), "Lyon, FR");
        assert!(report.forecast.is_empty());
    }
}
