//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::debug;
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api;
use crate::effect::Effect;
use crate::report::WeatherReport;
use crate::state::{AppState, FormField, DAYS_MAX, DAYS_MIN, LOADING_ANIM_CYCLE_TICKS};

/// Forecast cards per grid row
pub const FORECAST_COLUMNS: usize = 3;

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Form actions =====
        Action::FormModeSelect(mode) => {
            if mode == state.mode {
                return DispatchResult::unchanged();
            }
            state.mode = mode;
            if !state.visible_fields().contains(&state.focus) {
                state.focus = FormField::Mode;
            }
            DispatchResult::changed()
        }

        Action::FormCityChange(city) => {
            state.city = city;
            DispatchResult::changed()
        }

        Action::FormDaysChange(text) => {
            // Blank (or a lone sign) is a valid in-progress edit and counts as 0
            let trimmed = text.trim();
            let days = match trimmed {
                "" | "-" | "+" => Some(0),
                _ => trimmed.parse::<i64>().ok(),
            };
            let Some(days) = days else {
                return DispatchResult::unchanged();
            };
            if days == state.days && text == state.days_text {
                return DispatchResult::unchanged();
            }
            state.days = days;
            state.days_text = text;
            DispatchResult::changed()
        }

        Action::FormDaysStep(delta) => {
            let days = state.days.saturating_add(delta).clamp(DAYS_MIN, DAYS_MAX);
            if days == state.days && state.days_text == days.to_string() {
                DispatchResult::unchanged()
            } else {
                state.days = days;
                state.days_text = days.to_string();
                DispatchResult::changed()
            }
        }

        Action::FormLatitudeChange(lat) => {
            state.latitude = lat;
            DispatchResult::changed()
        }

        Action::FormLongitudeChange(lon) => {
            state.longitude = lon;
            DispatchResult::changed()
        }

        Action::FormFocusNext => {
            state.focus = cycle_focus(state.visible_fields(), state.focus, 1);
            DispatchResult::changed()
        }

        Action::FormFocusPrev => {
            state.focus = cycle_focus(state.visible_fields(), state.focus, -1);
            DispatchResult::changed()
        }

        // ===== Weather actions =====
        Action::WeatherFetch => {
            let query = state.query();
            let url = api::endpoint_url(&state.base_url, &query);
            state.request_seq = state.request_seq.wrapping_add(1);
            state.last_url = Some(url.clone());
            state.weather = DataResource::Loading;
            state.forecast_scroll = 0;
            state.tick_count = 0;
            state.loading_anim_ticks_remaining = 0;
            DispatchResult::changed_with(Effect::FetchWeather {
                seq: state.request_seq,
                query,
                url,
            })
        }

        Action::WeatherDidLoad { seq, report } => {
            if seq != state.request_seq {
                debug!(seq, latest = state.request_seq, "discarding stale weather result");
                return DispatchResult::unchanged();
            }
            state.weather = DataResource::Loaded(report);
            state.forecast_scroll = 0;
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        Action::WeatherDidError { seq, message } => {
            if seq != state.request_seq {
                debug!(seq, latest = state.request_seq, "discarding stale weather error");
                return DispatchResult::unchanged();
            }
            state.weather = DataResource::Failed(message);
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::UiScroll(rows) => {
            let Some(WeatherReport::Forecast(forecast)) = state.weather.data() else {
                return DispatchResult::unchanged();
            };
            let max_row = forecast.forecast.len().saturating_sub(1) / FORECAST_COLUMNS;
            let scroll = if rows < 0 {
                state.forecast_scroll.saturating_sub(rows.unsigned_abs() as usize)
            } else {
                state.forecast_scroll.saturating_add(rows as usize).min(max_row)
            };
            if scroll == state.forecast_scroll {
                DispatchResult::unchanged()
            } else {
                state.forecast_scroll = scroll;
                DispatchResult::changed()
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn cycle_focus(fields: &[FormField], current: FormField, step: isize) -> FormField {
    let len = fields.len() as isize;
    if len == 0 {
        return current;
    }
    let index = match fields.iter().position(|f| *f == current) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None => 0,
    };
    fields[index as usize]
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
