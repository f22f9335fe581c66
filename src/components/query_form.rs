use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::state::{AppState, FormField, QueryMode};

/// Width of the label column
const LABEL_WIDTH: u16 = 11;

const INPUT_BG: Color = Color::Rgb(50, 50, 60);
const ACCENT: Color = Color::Rgb(120, 170, 255);

/// The query form: one row per visible field, selector last
pub struct QueryForm {
    city: TextInput,
    days: TextInput,
    latitude: TextInput,
    longitude: TextInput,
}

pub struct QueryFormProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for QueryForm {
    fn default() -> Self {
        Self {
            city: TextInput::new(),
            days: TextInput::new(),
            latitude: TextInput::new(),
            longitude: TextInput::new(),
        }
    }
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows needed to draw the form for `mode` (fields plus spacers)
    pub fn height(mode: QueryMode) -> u16 {
        (mode.fields().len() as u16 * 2).saturating_sub(1)
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut TextInput> {
        match field {
            FormField::City => Some(&mut self.city),
            FormField::Days => Some(&mut self.days),
            FormField::Latitude => Some(&mut self.latitude),
            FormField::Longitude => Some(&mut self.longitude),
            FormField::Mode => None,
        }
    }
}

/// Current text and change action for a text field
fn field_binding(state: &AppState, field: FormField) -> (String, fn(String) -> Action) {
    match field {
        FormField::City => (state.city.clone(), Action::FormCityChange),
        FormField::Days => (state.days_text.clone(), Action::FormDaysChange),
        FormField::Latitude => (state.latitude.clone(), Action::FormLatitudeChange),
        FormField::Longitude => (state.longitude.clone(), Action::FormLongitudeChange),
        FormField::Mode => (String::new(), ignore_text),
    }
}

fn ignore_text(_: String) -> Action {
    Action::Render
}

fn submit_form(_: String) -> Action {
    Action::WeatherFetch
}

fn cursor_moved(_: usize) -> Action {
    Action::Render
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(INPUT_BG),
            fg: None,
        },
        placeholder_style: Some(Style::default().fg(Color::DarkGray)),
        cursor_style: Some(Style::default().bg(ACCENT).fg(Color::Black)),
    }
}

fn label_line(field: FormField, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "› " } else { "  " };
    Line::from(vec![Span::styled(marker, style), Span::styled(field.label(), style)])
}

/// Selector row: every mode, the active one highlighted
fn mode_selector_line(active: QueryMode, focused: bool) -> Line<'static> {
    let mut spans = Vec::with_capacity(QueryMode::ALL.len() * 2 + 2);
    if focused {
        spans.push(Span::styled("◀ ", Style::default().fg(ACCENT)));
    }
    for (i, mode) in QueryMode::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if mode == active {
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
    }
    if focused {
        spans.push(Span::styled(" ▶", Style::default().fg(ACCENT)));
    }
    Line::from(spans)
}

impl Component<Action> for QueryForm {
    type Props<'a> = QueryFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        // Keys that work from any field
        match key.code {
            KeyCode::Tab => return vec![Action::FormFocusNext],
            KeyCode::BackTab => return vec![Action::FormFocusPrev],
            KeyCode::Enter => return vec![Action::WeatherFetch],
            KeyCode::Esc => return vec![Action::Quit],
            KeyCode::PageDown => return vec![Action::UiScroll(1)],
            KeyCode::PageUp => return vec![Action::UiScroll(-1)],
            _ => {}
        }

        let state = props.state;
        let field = state.focus;
        match (field, key.code) {
            (FormField::Mode, KeyCode::Left | KeyCode::Char('h')) => {
                return vec![Action::FormModeSelect(state.mode.prev())];
            }
            (FormField::Mode, KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ')) => {
                return vec![Action::FormModeSelect(state.mode.next())];
            }
            (FormField::Mode, KeyCode::Char('u')) => return vec![Action::UiToggleUnits],
            (FormField::Mode, KeyCode::Char('q')) => return vec![Action::Quit],
            (FormField::Mode, _) => return Vec::new(),
            (FormField::Days, KeyCode::Up) => return vec![Action::FormDaysStep(1)],
            (FormField::Days, KeyCode::Down) => return vec![Action::FormDaysStep(-1)],
            _ => {}
        }

        // Everything else edits the focused text field
        let (value, on_change) = field_binding(state, field);
        let Some(input) = self.input_mut(field) else {
            return Vec::new();
        };
        let input_props = TextInputProps {
            value: &value,
            placeholder: field.placeholder(),
            is_focused: true,
            style: input_style(),
            on_change,
            on_submit: submit_form,
            on_cursor_move: Some(cursor_moved),
        };
        input.handle_event(event, input_props).into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let fields = state.visible_fields();

        let mut constraints = Vec::with_capacity(fields.len() * 2);
        for i in 0..fields.len() {
            if i > 0 {
                constraints.push(Constraint::Length(1));
            }
            constraints.push(Constraint::Length(1));
        }
        let rows = Layout::vertical(constraints).split(area);

        for (i, &field) in fields.iter().enumerate() {
            let row = rows[i * 2];
            let focused = props.is_focused && state.focus == field;
            let [label_area, input_area] =
                Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
                    .areas(row);

            frame.render_widget(Paragraph::new(label_line(field, focused)), label_area);

            if field == FormField::Mode {
                frame.render_widget(
                    Paragraph::new(mode_selector_line(state.mode, focused)),
                    input_area,
                );
                continue;
            }

            let (value, on_change) = field_binding(state, field);
            let Some(input) = self.input_mut(field) else {
                continue;
            };
            let input_props = TextInputProps {
                value: &value,
                placeholder: field.placeholder(),
                is_focused: focused,
                style: input_style(),
                on_change,
                on_submit: submit_form,
                on_cursor_move: Some(cursor_moved),
            };
            input.render(frame, input_area, input_props);
        }
    }
}
