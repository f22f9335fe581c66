use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use tui_dispatch::DataResource;

use super::{Component, ERROR_ICON};
use crate::action::Action;
use crate::icons;
use crate::reducer::FORECAST_COLUMNS;
use crate::report::{
    Condition, CoordinatesWeather, CurrentWeather, ForecastEntry, ForecastReport, WeatherReport,
};
use crate::state::{AppState, TempUnit};

/// Shown in place of any optional field the service left out
pub const NOT_AVAILABLE: &str = "n/a";

/// Card height: 7 content rows + border
const CARD_HEIGHT: u16 = 9;

const HEADING: Color = Color::Rgb(120, 170, 255);

/// Renders whatever the result slot holds
pub struct ResultView;

pub struct ResultViewProps<'a> {
    pub state: &'a AppState,
}

impl Component<Action> for ResultView {
    type Props<'a> = ResultViewProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        match &state.weather {
            DataResource::Empty => render_hint(frame, area, "Press ", "Enter", " to get weather"),
            DataResource::Loading => render_hint(frame, area, "", "", "Loading..."),
            DataResource::Failed(message) => render_error(frame, area, message),
            DataResource::Loaded(WeatherReport::Current(current)) => {
                render_fields(frame, area, "Current Weather", current_lines(current));
            }
            DataResource::Loaded(WeatherReport::Coordinates(coords)) => {
                render_fields(
                    frame,
                    area,
                    "Weather Details",
                    coordinates_lines(coords, state.unit),
                );
            }
            DataResource::Loaded(WeatherReport::Forecast(forecast)) => {
                render_forecast(frame, area, forecast, state.unit, state.forecast_scroll);
            }
        }
    }
}

// ============================================================================
// Line builders
// ============================================================================

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().bold()),
        Span::raw(value.into()),
    ])
}

fn or_na<T>(value: Option<T>, fmt: impl FnOnce(T) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn condition_text(condition: Option<&Condition>) -> String {
    or_na(condition, |c| {
        format!("{} {}", icons::condition_emoji(&c.main), c.summary())
    })
}

/// Rows for `/weather`, values verbatim
pub fn current_lines(current: &CurrentWeather) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Temperature", current.temperature.clone()),
        field("Humidity", current.humidity.clone()),
        field("Description", current.description.clone()),
    ];
    if let Some(pressure) = &current.pressure {
        lines.push(field("Pressure", pressure.clone()));
    }
    lines
}

/// Rows for `/weather_by_coords`
pub fn coordinates_lines(coords: &CoordinatesWeather, unit: TempUnit) -> Vec<Line<'static>> {
    let wind = coords.wind.as_ref();
    vec![
        field("Location", coords.location()),
        field("Temperature", unit.format_kelvin(coords.main.temp)),
        field("Feels like", unit.format_kelvin(coords.main.feels_like)),
        field("Weather", condition_text(coords.condition())),
        field("Humidity", format!("{}%", coords.main.humidity)),
        field("Pressure", or_na(coords.main.pressure, |p| format!("{} hPa", p))),
        field("Wind Speed", or_na(wind.map(|w| w.speed), |s| format!("{} m/s", s))),
        field(
            "Wind Direction",
            or_na(wind.and_then(|w| w.deg), |d| format!("{}°", d)),
        ),
    ]
}

/// Rows inside one forecast card (the timestamp is the card title)
pub fn forecast_card_lines(entry: &ForecastEntry, unit: TempUnit) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Weather", condition_text(entry.condition())),
        field("Temperature", unit.format_kelvin(entry.main.temp)),
        field("Feels like", unit.format_kelvin(entry.main.feels_like)),
        field("Humidity", format!("{}%", entry.main.humidity)),
        field("Pressure", or_na(entry.main.pressure, |p| format!("{} hPa", p))),
    ];
    if let Some(chance) = entry.rain_chance() {
        lines.push(field("Chance of Rain", format!("{}%", chance)));
    }
    lines.push(field(
        "Wind",
        or_na(entry.wind.as_ref(), |w| match w.deg {
            Some(deg) => format!("{} m/s, {}°", w.speed, deg),
            None => format!("{} m/s", w.speed),
        }),
    ));
    lines
}

// ============================================================================
// Renderers
// ============================================================================

fn heading(text: String) -> Line<'static> {
    Line::from(vec![Span::styled(text, Style::default().fg(HEADING).bold())])
}

fn render_fields(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let mut text = Vec::with_capacity(lines.len() + 2);
    text.push(heading(title.to_string()));
    text.push(Line::default());
    text.extend(lines);
    frame.render_widget(Paragraph::new(text), area);
}

fn render_forecast(
    frame: &mut Frame,
    area: Rect,
    forecast: &ForecastReport,
    unit: TempUnit,
    scroll: usize,
) {
    let [title_area, summary_area, grid_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(heading(format!("Weather Forecast for {}", forecast.location()))),
        title_area,
    );

    let total = forecast.forecast.len();
    let visible_rows = (grid_area.height / CARD_HEIGHT) as usize;
    let first = (scroll * FORECAST_COLUMNS).min(total);
    let last = (first + visible_rows * FORECAST_COLUMNS).min(total);
    let summary = if total == 0 {
        "0 entries".to_string()
    } else {
        format!("entries {}-{} of {} · times in UTC", first + 1, last, total)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            summary,
            Style::default().fg(Color::DarkGray),
        )])),
        summary_area,
    );

    if visible_rows == 0 {
        return;
    }

    let rows =
        Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(grid_area);
    for (row_index, chunk) in forecast.forecast[first..last]
        .chunks(FORECAST_COLUMNS)
        .enumerate()
    {
        let cells = Layout::horizontal(vec![
            Constraint::Ratio(1, FORECAST_COLUMNS as u32);
            FORECAST_COLUMNS
        ])
        .split(rows[row_index]);
        for (cell, entry) in cells.iter().zip(chunk) {
            let card = Paragraph::new(forecast_card_lines(entry, unit)).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(entry.timestamp_label()),
            );
            frame.render_widget(card, *cell);
        }
    }
}

fn render_hint(frame: &mut Frame, area: Rect, before: &str, key: &str, after: &str) {
    let [line_area] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let hint = Line::from(vec![
        Span::styled(before.to_string(), Style::default().fg(Color::DarkGray)),
        Span::styled(key.to_string(), Style::default().fg(Color::Cyan).bold()),
        Span::styled(after.to_string(), Style::default().fg(Color::DarkGray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(hint), line_area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(Paragraph::new(Line::from(ERROR_ICON).centered()), chunks[0]);
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled("Error", Style::default().fg(Color::Red).bold())])
                .centered(),
        ),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                message.to_string(),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            )])
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to retry", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[4],
    );
}
