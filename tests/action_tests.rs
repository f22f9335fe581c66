//! Action and state tests using TestHarness
//!
//! - Create harness with initial state
//! - Emit actions to simulate user/async events
//! - Drain and assert emitted actions

use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, NumericComponentId, assert_emitted, assert_not_emitted};
use weather_form::{
    action::Action,
    api::FETCH_FAILED_MESSAGE,
    components::{Component, WeatherApp, WeatherAppProps},
    effect::Effect,
    reducer::reducer,
    report::{CurrentWeather, WeatherReport},
    state::{AppState, FormField, QueryMode, TempUnit, WeatherQuery},
};

fn current_report() -> WeatherReport {
    WeatherReport::Current(CurrentWeather {
        temperature: "15 C".into(),
        humidity: "70%".into(),
        description: "Cloudy".into(),
        pressure: None,
    })
}

#[test]
fn test_reducer_weather_fetch() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    assert!(store.state().weather.is_empty());

    // Dispatch fetch - should set loading and return FetchWeather effect
    let result = store.dispatch(Action::WeatherFetch);
    assert!(result.changed, "State should change");
    assert!(store.state().weather.is_loading());
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(result.effects[0], Effect::FetchWeather { seq: 1, .. }));
}

#[test]
fn test_reducer_weather_load() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::WeatherFetch);
    store.dispatch(Action::WeatherDidLoad {
        seq: 1,
        report: current_report(),
    });

    assert!(store.state().weather.is_loaded());
    assert_eq!(store.state().weather.data(), Some(&current_report()));
}

#[test]
fn test_reducer_forecast_days_pass_through() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::FormModeSelect(QueryMode::Forecast));
    store.dispatch(Action::FormCityChange("Rome".into()));

    for (typed, expected) in [("0", 0), ("9", 9)] {
        store.dispatch(Action::FormDaysChange(typed.into()));
        let result = store.dispatch(Action::WeatherFetch);
        match &result.effects[0] {
            Effect::FetchWeather { query, url, .. } => {
                assert_eq!(
                    query,
                    &WeatherQuery::Forecast {
                        city: "Rome".into(),
                        days: expected
                    }
                );
                assert!(url.ends_with(&format!("/forecast?city=Rome&days={}", expected)));
            }
        }
    }
}

#[test]
fn test_reducer_toggle_units() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    assert_eq!(store.state().unit, TempUnit::Celsius);
    store.dispatch(Action::UiToggleUnits);
    assert_eq!(store.state().unit, TempUnit::Fahrenheit);
    store.dispatch(Action::UiToggleUnits);
    assert_eq!(store.state().unit, TempUnit::Celsius);
}

#[test]
fn test_component_keyboard_events() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = WeatherApp::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = WeatherAppProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::WeatherFetch);
}

#[test]
fn test_component_typing_edits_focused_field() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState {
        focus: FormField::City,
        ..Default::default()
    });
    let mut component = WeatherApp::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("x", |state, event| {
        let props = WeatherAppProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    assert_emitted!(actions, Action::FormCityChange(_));
    assert_not_emitted!(actions, Action::WeatherFetch);
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = WeatherApp::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter tab esc", |state, event| {
        let props = WeatherAppProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::WeatherDidLoad {
        seq: 1,
        report: current_report(),
    };
    let toggle = Action::UiToggleUnits;
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("weather_did"));
    assert_eq!(toggle.category(), Some("ui"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_weather_did());
    assert!(toggle.is_ui());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::WeatherFetch);
    harness.emit(Action::UiToggleUnits);
    harness.emit(Action::WeatherDidError {
        seq: 1,
        message: FETCH_FAILED_MESSAGE.into(),
    });

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::WeatherFetch,
        Action::WeatherDidLoad {
            seq: 1,
            report: current_report(),
        },
    ];

    assert_emitted!(actions, Action::WeatherFetch);
    assert_emitted!(actions, Action::WeatherDidLoad { .. });
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::WeatherDidError { .. });
}

#[test]
fn test_custom_base_url() {
    let state = AppState::new("http://weather.internal:8080/");

    let mut store = EffectStore::new(state, reducer);
    store.dispatch(Action::FormCityChange("Oslo".into()));
    let result = store.dispatch(Action::WeatherFetch);

    match &result.effects[0] {
        Effect::FetchWeather { url, .. } => {
            assert_eq!(url, "http://weather.internal:8080/weather?city=Oslo");
        }
    }
    assert_eq!(
        store.state().last_url.as_deref(),
        Some("http://weather.internal:8080/weather?city=Oslo")
    );
}

#[test]
fn test_temp_unit_formatting() {
    // 273.15 K = 0°C = 32°F
    assert_eq!(TempUnit::Celsius.format_kelvin(273.15), "0.00°C");
    assert_eq!(TempUnit::Fahrenheit.format_kelvin(273.15), "32.00°F");

    // 373.15 K = 100°C = 212°F
    assert_eq!(TempUnit::Celsius.format_kelvin(373.15), "100.00°C");
    assert_eq!(TempUnit::Fahrenheit.format_kelvin(373.15), "212.00°F");
}
