//! Actions - form edits, request lifecycle and UI toggles

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::WeatherReport;
use crate::state::QueryMode;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Form category =====
    /// Switch the active query mode (field values are kept)
    FormModeSelect(QueryMode),

    /// City input changed
    FormCityChange(String),

    /// Day count input changed (raw text)
    FormDaysChange(String),

    /// Day count stepped up or down by the arrow keys
    FormDaysStep(i64),

    /// Latitude input changed
    FormLatitudeChange(String),

    /// Longitude input changed
    FormLongitudeChange(String),

    /// Move focus to the next visible field
    FormFocusNext,

    /// Move focus to the previous visible field
    FormFocusPrev,

    // ===== Weather category =====
    /// Intent: submit the form (triggers async task)
    WeatherFetch,

    /// Result: request `seq` returned a payload matching its mode
    WeatherDidLoad { seq: u64, report: WeatherReport },

    /// Result: request `seq` failed
    WeatherDidError { seq: u64, message: String },

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Scroll forecast cards by the given number of rows
    UiScroll(i32),

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
