use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, ColorStop, Fill, LinearGradient, Renderer,
    fonts, integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

pub const APP_TITLE: &str = "Weather App";

/// Big gradient title plus the endpoint line underneath
pub struct TitleHeader;

pub struct TitleHeaderProps<'a> {
    /// Shown when nothing has been requested yet
    pub base_url: &'a str,
    pub last_url: Option<&'a str>,
    /// Celsius reading of the loaded report, if it has one
    pub celsius: Option<f64>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Rows below the FIGlet title: endpoint line.
pub const TITLE_OVERHEAD: u16 = 1;

fn palette(celsius: Option<f64>) -> (ArtColor, ArtColor) {
    match celsius {
        Some(t) if t < 0.0 => (ArtColor::rgb(150, 200, 255), ArtColor::rgb(200, 230, 255)),
        Some(t) if t < 15.0 => (ArtColor::rgb(100, 180, 255), ArtColor::rgb(150, 220, 200)),
        Some(t) if t < 25.0 => (ArtColor::rgb(100, 200, 150), ArtColor::rgb(255, 220, 100)),
        Some(t) if t < 35.0 => (ArtColor::rgb(255, 180, 80), ArtColor::rgb(255, 120, 80)),
        Some(_) => (ArtColor::rgb(255, 100, 80), ArtColor::rgb(255, 60, 60)),
        // Same blue as the title bar of the form
        None => (ArtColor::rgb(120, 170, 255), ArtColor::rgb(180, 210, 255)),
    }
}

/// Cool-to-warm fill. While loading, a pale band rides along it at `glow` (0..1).
fn title_fill((cool, warm): (ArtColor, ArtColor), glow: Option<f32>) -> Fill {
    let along = |t: f32| cool.interpolate(warm, t);
    let stops = match glow {
        None => vec![ColorStop::new(0.0, cool), ColorStop::new(1.0, warm)],
        Some(glow) => {
            let center = 0.15 + 0.7 * glow.clamp(0.0, 1.0);
            let band = along(center).interpolate(ArtColor::rgb(255, 255, 255), 0.6);
            vec![
                ColorStop::new(0.0, cool),
                ColorStop::new(center - 0.12, along(center - 0.12)),
                ColorStop::new(center, band),
                ColorStop::new(center + 0.12, along(center + 0.12)),
                ColorStop::new(1.0, warm),
            ]
        }
    };
    Fill::Linear(LinearGradient::new(0.0, stops))
}

/// Band position for a tick: left to right and back once per cycle
fn glow_position(tick_count: u32) -> f32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    let t = (tick_count % cycle) as f32 / cycle as f32;
    if t < 0.5 { t * 2.0 } else { 2.0 - t * 2.0 }
}

impl Component<Action> for TitleHeader {
    type Props<'a> = TitleHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title
            Constraint::Length(1), // Endpoint
        ])
        .split(area);

        let glow = props.is_animating.then(|| glow_position(props.tick_count));
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(title_fill(palette(props.celsius), glow));
        frame.render_widget(ArtBox::new(&renderer, APP_TITLE), chunks[0]);

        let endpoint = match props.last_url {
            Some(url) => format!("GET {}", url),
            None => props.base_url.to_string(),
        };
        let endpoint_line = Line::from(vec![Span::styled(
            endpoint,
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(endpoint_line), chunks[1]);
    }
}
