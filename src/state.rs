//! Application state - single source of truth

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::report::WeatherReport;

/// Service address used when neither `--base-url` nor `WEATHER_BASE_URL` is set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Bounds for arrow-key stepping on the day count. Typed values are not clamped.
pub const DAYS_MIN: i64 = 1;
pub const DAYS_MAX: i64 = 5;

/// Which endpoint a submission goes to, and which inputs the form shows
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    #[default]
    Current,
    Coordinates,
    Forecast,
}

impl QueryMode {
    pub const ALL: [QueryMode; 3] = [
        QueryMode::Current,
        QueryMode::Coordinates,
        QueryMode::Forecast,
    ];

    pub fn next(self) -> Self {
        match self {
            QueryMode::Current => QueryMode::Coordinates,
            QueryMode::Coordinates => QueryMode::Forecast,
            QueryMode::Forecast => QueryMode::Current,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            QueryMode::Current => QueryMode::Forecast,
            QueryMode::Coordinates => QueryMode::Current,
            QueryMode::Forecast => QueryMode::Coordinates,
        }
    }

    /// Label shown in the mode selector
    pub fn label(self) -> &'static str {
        match self {
            QueryMode::Current => "Current Weather",
            QueryMode::Coordinates => "Weather by Coordinates",
            QueryMode::Forecast => "Weather Forecast",
        }
    }

    /// Fields shown for this mode, in focus order. The selector is always last.
    pub fn fields(self) -> &'static [FormField] {
        match self {
            QueryMode::Current => &[FormField::City, FormField::Mode],
            QueryMode::Coordinates => &[FormField::Latitude, FormField::Longitude, FormField::Mode],
            QueryMode::Forecast => &[FormField::Days, FormField::City, FormField::Mode],
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryMode::Current => "current",
            QueryMode::Coordinates => "coordinates",
            QueryMode::Forecast => "forecast",
        };
        f.write_str(name)
    }
}

/// A focusable input in the query form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    Mode,
    #[default]
    City,
    Days,
    Latitude,
    Longitude,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Mode => "Query",
            FormField::City => "City",
            FormField::Days => "Days",
            FormField::Latitude => "Latitude",
            FormField::Longitude => "Longitude",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Mode => "",
            FormField::City => "Enter city name",
            FormField::Days => "Enter number of days",
            FormField::Latitude => "Enter latitude",
            FormField::Longitude => "Enter longitude",
        }
    }
}

/// Snapshot of the form taken when a request is issued
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum WeatherQuery {
    Current { city: String },
    Coordinates { lat: String, lon: String },
    Forecast { city: String, days: i64 },
}

impl WeatherQuery {
    pub fn mode(&self) -> QueryMode {
        match self {
            WeatherQuery::Current { .. } => QueryMode::Current,
            WeatherQuery::Coordinates { .. } => QueryMode::Coordinates,
            WeatherQuery::Forecast { .. } => QueryMode::Forecast,
        }
    }
}

/// The service reports temperatures in Kelvin.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    kelvin * 9.0 / 5.0 - 459.67
}

/// Round to 2 decimal places, half away from zero. Never yields negative zero.
///
/// Works on the shortest decimal form of `value` (what `Display` prints), so
/// `1.005` rounds to `1.01` even though the nearest double is slightly below it.
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut digits = String::with_capacity(int_part.len() + 2);
    digits.push_str(int_part);
    digits.extend(frac_part.chars().chain(std::iter::repeat('0')).take(2));
    let round_up = frac_part.chars().nth(2).is_some_and(|d| d >= '5');

    let Ok(cents) = digits.parse::<u128>() else {
        return (value * 100.0).round() / 100.0 + 0.0;
    };
    let cents = cents + u128::from(round_up);
    if cents == 0 {
        return 0.0;
    }
    let magnitude = cents as f64 / 100.0;
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn convert_kelvin(&self, kelvin: f64) -> f64 {
        match self {
            TempUnit::Celsius => kelvin_to_celsius(kelvin),
            TempUnit::Fahrenheit => kelvin_to_fahrenheit(kelvin),
        }
    }

    pub fn format_kelvin(&self, kelvin: f64) -> String {
        let value = round_hundredths(self.convert_kelvin(kelvin));
        match self {
            TempUnit::Celsius => format!("{:.2}°C", value),
            TempUnit::Fahrenheit => format!("{:.2}°F", value),
        }
    }
}

/// Animation timing for the title gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Root of the three endpoints
    #[debug(section = "Service", label = "Base URL")]
    pub base_url: String,

    /// URL of the most recently issued request
    #[debug(section = "Service", label = "Last request", debug_fmt)]
    pub last_url: Option<String>,

    /// Sequence token of the most recently issued request
    #[debug(section = "Service", label = "Request #")]
    pub request_seq: u64,

    // --- Form ---
    #[debug(section = "Form", label = "Mode", debug_fmt)]
    pub mode: QueryMode,

    #[debug(section = "Form", label = "City")]
    pub city: String,

    #[debug(section = "Form", label = "Days")]
    pub days: i64,

    /// Day count as typed; may be blank while editing
    #[debug(skip)]
    pub days_text: String,

    #[debug(section = "Form", label = "Latitude")]
    pub latitude: String,

    #[debug(section = "Form", label = "Longitude")]
    pub longitude: String,

    #[debug(section = "Form", label = "Focus", debug_fmt)]
    pub focus: FormField,

    // --- Result ---
    /// Result lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Weather", label = "Data", debug_fmt)]
    pub weather: DataResource<WeatherReport>,

    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    /// First visible row of forecast cards
    #[debug(skip)]
    pub forecast_scroll: usize,

    // --- Animation internals (skipped) ---
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    /// Create an empty form that talks to the given service
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            last_url: None,
            request_seq: 0,
            mode: QueryMode::default(),
            city: String::new(),
            days: DAYS_MIN,
            days_text: DAYS_MIN.to_string(),
            latitude: String::new(),
            longitude: String::new(),
            focus: FormField::default(),
            weather: DataResource::Empty,
            unit: TempUnit::default(),
            forecast_scroll: 0,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }

    /// Fields visible for the active mode, in focus order
    pub fn visible_fields(&self) -> &'static [FormField] {
        self.mode.fields()
    }

    /// Snapshot the form for the active mode
    pub fn query(&self) -> WeatherQuery {
        match self.mode {
            QueryMode::Current => WeatherQuery::Current {
                city: self.city.clone(),
            },
            QueryMode::Coordinates => WeatherQuery::Coordinates {
                lat: self.latitude.clone(),
                lon: self.longitude.clone(),
            },
            QueryMode::Forecast => WeatherQuery::Forecast {
                city: self.city.clone(),
                days: self.days,
            },
        }
    }

    pub fn loading_anim_active(&self) -> bool {
        self.weather.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(round_hundredths(kelvin_to_celsius(273.15)), 0.0);
        assert_eq!(round_hundredths(kelvin_to_celsius(300.0)), 26.85);
    }

    #[test]
    fn test_format_kelvin() {
        assert_eq!(TempUnit::Celsius.format_kelvin(300.0), "26.85°C");
        assert_eq!(TempUnit::Celsius.format_kelvin(300.15), "27.00°C");
        assert_eq!(TempUnit::Fahrenheit.format_kelvin(273.15), "32.00°F");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(TempUnit::Celsius.format_kelvin(273.149), "0.00°C");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_hundredths(0.125), 0.13);
        assert_eq!(round_hundredths(-0.125), -0.13);
        assert_eq!(round_hundredths(1.005), 1.01);
        assert_eq!(round_hundredths(-1.005), -1.01);
        assert_eq!(round_hundredths(2.675), 2.68);
        assert_eq!(round_hundredths(26.850000000000023), 26.85);
        assert_eq!(round_hundredths(31.999999999999996), 32.0);
        assert_eq!(round_hundredths(15.0), 15.0);
    }

    #[test]
    fn test_round_hundredths_edges() {
        assert_eq!(round_hundredths(-0.004).to_string(), "0");
        assert!(round_hundredths(f64::NAN).is_nan());
    }

    #[test]
    fn test_mode_cycle() {
        for mode in QueryMode::ALL {
            assert_eq!(mode.next().prev(), mode);
        }
        assert_eq!(QueryMode::Forecast.next(), QueryMode::Current);
    }

    #[test]
    fn test_selector_is_last_field() {
        for mode in QueryMode::ALL {
            assert_eq!(mode.fields().last(), Some(&FormField::Mode));
        }
    }

    #[test]
    fn test_query_snapshot_follows_mode() {
        let mut state = AppState {
            city: "Oslo".into(),
            days: 3,
            latitude: "59.9".into(),
            longitude: "10.7".into(),
            ..Default::default()
        };

        assert_eq!(state.query(), WeatherQuery::Current { city: "Oslo".into() });

        state.mode = QueryMode::Forecast;
        assert_eq!(
            state.query(),
            WeatherQuery::Forecast {
                city: "Oslo".into(),
                days: 3
            }
        );

        state.mode = QueryMode::Coordinates;
        assert_eq!(state.query().mode(), QueryMode::Coordinates);
    }
}
