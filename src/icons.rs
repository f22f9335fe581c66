//! Condition icons keyed on the service's `weather[].main` group

/// Weather condition categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherCondition {
    ClearSky,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Map an OpenWeatherMap condition group ("Clear", "Rain", ...) to a category
    pub fn from_group(group: &str) -> Self {
        match group.to_ascii_lowercase().as_str() {
            "clear" => WeatherCondition::ClearSky,
            "clouds" => WeatherCondition::Cloudy,
            "mist" | "fog" | "haze" | "smoke" | "dust" | "sand" | "ash" => WeatherCondition::Fog,
            "drizzle" => WeatherCondition::Drizzle,
            "rain" | "squall" => WeatherCondition::Rain,
            "snow" => WeatherCondition::Snow,
            "thunderstorm" | "tornado" => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "\u{2600}\u{fe0f}",
            WeatherCondition::Cloudy | WeatherCondition::Unknown => "\u{2601}\u{fe0f}",
            WeatherCondition::Fog => "\u{1f32b}\u{fe0f}",
            WeatherCondition::Drizzle => "\u{1f326}\u{fe0f}",
            WeatherCondition::Rain => "\u{1f327}\u{fe0f}",
            WeatherCondition::Snow => "\u{2744}\u{fe0f}",
            WeatherCondition::Thunderstorm => "\u{26c8}\u{fe0f}",
        }
    }
}

pub fn condition_emoji(group: &str) -> &'static str {
    WeatherCondition::from_group(group).emoji()
}
