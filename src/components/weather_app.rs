use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    Component, QueryForm, QueryFormProps, ResultView, ResultViewProps, TitleHeader,
    TitleHeaderProps,
};
use super::title_header::TITLE_OVERHEAD;
use crate::action::Action;
use crate::report::WeatherReport;
use crate::state::{AppState, kelvin_to_celsius};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Props for WeatherApp - read-only view of state
pub struct WeatherAppProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole screen: title, form, result and key hints
#[derive(Default)]
pub struct WeatherApp {
    form: QueryForm,
}

impl WeatherApp {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Title height for the terminal height: terminus(6), miniwi(4), plain(1)
fn title_height(area_height: u16) -> u16 {
    let figlet = match area_height {
        h if h >= 36 => 6,
        h if h >= 26 => 4,
        _ => 1,
    };
    figlet + TITLE_OVERHEAD
}

/// Reading used to tint the title
fn headline_celsius(state: &AppState) -> Option<f64> {
    match state.weather.data()? {
        WeatherReport::Coordinates(coords) => Some(kelvin_to_celsius(coords.main.temp)),
        WeatherReport::Forecast(forecast) => forecast
            .forecast
            .first()
            .map(|entry| kelvin_to_celsius(entry.main.temp)),
        WeatherReport::Current(_) => None,
    }
}

impl Component<Action> for WeatherApp {
    type Props<'a> = WeatherAppProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        self.form
            .handle_event(
                event,
                QueryFormProps {
                    state: props.state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherAppProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(title_height(area.height)), // Title
            Constraint::Length(1),                          // Spacer
            Constraint::Length(QueryForm::height(state.mode)), // Form
            Constraint::Length(1),                          // Spacer
            Constraint::Min(1),                             // Result
            Constraint::Length(1),                          // Help bar
        ])
        .split(area);

        let mut title = TitleHeader;
        title.render(
            frame,
            chunks[0],
            TitleHeaderProps {
                base_url: &state.base_url,
                last_url: state.last_url.as_deref(),
                celsius: headline_celsius(state),
                is_animating: state.loading_anim_active(),
                tick_count: state.tick_count,
            },
        );

        self.form.render(
            frame,
            chunks[2],
            QueryFormProps {
                state,
                is_focused: props.is_focused,
            },
        );

        let mut result = ResultView;
        result.render(frame, chunks[4], ResultViewProps { state });

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[5],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("Enter", "fetch"),
                    StatusBarHint::new("Tab", "field"),
                    StatusBarHint::new("←/→", "mode"),
                    StatusBarHint::new("u", "units"),
                    StatusBarHint::new("Esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FormField, QueryMode};
    use tui_dispatch::DataResource;
    use tui_dispatch::testing::*;

    fn render(state: &AppState) -> String {
        let mut render = RenderHarness::new(90, 40);
        let mut component = WeatherApp::new();
        render.render_to_string_plain(|frame| {
            let props = WeatherAppProps {
                state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        })
    }

    #[test]
    fn test_handle_event_submit() {
        let mut component = WeatherApp::new();
        let state = AppState::default();
        let props = WeatherAppProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("enter")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::WeatherFetch);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = WeatherApp::new();
        let state = AppState::default();
        let props = WeatherAppProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("enter")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_loading() {
        let state = AppState {
            weather: DataResource::Loading,
            ..Default::default()
        };

        assert!(render(&state).contains("Loading..."));
    }

    #[test]
    fn test_render_shows_mode_inputs() {
        let state = AppState {
            mode: QueryMode::Coordinates,
            focus: FormField::Latitude,
            ..Default::default()
        };

        let output = render(&state);
        assert!(output.contains("Latitude"));
        assert!(output.contains("Longitude"));
        assert!(!output.contains("City"));
    }

    #[test]
    fn test_title_shrinks_with_terminal() {
        assert_eq!(title_height(40), 7);
        assert_eq!(title_height(30), 5);
        assert_eq!(title_height(20), 2);
    }
}
