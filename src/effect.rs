//! Effects - side effects declared by the reducer

use crate::state::WeatherQuery;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// GET `url` and decode the body against `query`'s mode
    FetchWeather {
        seq: u64,
        query: WeatherQuery,
        url: String,
    },
}
