//! Weather service client

use tracing::debug;

use crate::report::WeatherReport;
use crate::state::{QueryMode, WeatherQuery};

/// The only failure text ever shown to the user
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data";

/// Why a request produced no report. Logged, never displayed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("weather service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("weather service reported an error: {0}")]
    Service(String),
    #[error("unexpected {mode} payload: {source}")]
    Decode {
        mode: QueryMode,
        source: serde_json::Error,
    },
}

/// Build the request URL for `query` under `base_url`.
///
/// Text values are percent-encoded; the day count goes in as its literal
/// integer, in or out of range.
pub fn endpoint_url(base_url: &str, query: &WeatherQuery) -> String {
    let base = base_url.trim_end_matches('/');
    match query {
        WeatherQuery::Current { city } => {
            format!("{}/weather?city={}", base, urlencoding::encode(city))
        }
        WeatherQuery::Coordinates { lat, lon } => format!(
            "{}/weather_by_coords?lat={}&lon={}",
            base,
            urlencoding::encode(lat),
            urlencoding::encode(lon)
        ),
        WeatherQuery::Forecast { city, days } => format!(
            "{}/forecast?city={}&days={}",
            base,
            urlencoding::encode(city),
            days
        ),
    }
}

/// GET `url` and decode the body against the schema for `mode`
pub async fn fetch_report(url: &str, mode: QueryMode) -> Result<WeatherReport, FetchError> {
    let response = reqwest::get(url).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.bytes().await?;
    decode_report(mode, &body)
}

/// Decode a 2xx body. The service answers some failures with 200 and an
/// `Error`/`error` key, so that is checked before the mode's schema.
pub fn decode_report(mode: QueryMode, body: &[u8]) -> Result<WeatherReport, FetchError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|source| FetchError::Decode { mode, source })?;

    if let Some(message) = service_error(&value) {
        return Err(FetchError::Service(message));
    }

    debug!(%mode, "decoding weather payload");
    WeatherReport::from_value(mode, value).map_err(|source| FetchError::Decode { mode, source })
}

fn service_error(value: &serde_json::Value) -> Option<String> {
    ["Error", "error"]
        .iter()
        .find_map(|key| value.get(*key))
        .map(|err| match err.as_str() {
            Some(text) => text.to_string(),
            None => err.to_string(),
        })
}
