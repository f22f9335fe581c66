//! Weather form - terminal client for the weather service

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_form::action::Action;
use weather_form::api;
use weather_form::components::{Component, WeatherApp, WeatherAppProps};
use weather_form::effect::Effect;
use weather_form::reducer::reducer;
use weather_form::state::{
    AppState, DAYS_MIN, DEFAULT_BASE_URL, LOADING_ANIM_TICK_MS, QueryMode,
};

/// Query a weather service by city, coordinates or multi-day forecast
#[derive(Parser, Debug)]
#[command(name = "weather-form")]
#[command(about = "Query a weather service by city, coordinates or forecast")]
struct Args {
    /// Root URL of the weather service
    #[arg(long, env = "WEATHER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Query mode to start in
    #[arg(long, value_enum, default_value_t = QueryMode::Current)]
    mode: QueryMode,

    /// Pre-fill the city field
    #[arg(long, short)]
    city: Option<String>,

    /// Pre-fill the day count (sent as-is, the service accepts 1-5)
    #[arg(long, default_value_t = DAYS_MIN, allow_negative_numbers = true)]
    days: i64,

    /// Pre-fill the latitude field
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Pre-fill the longitude field
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Submit the form once at startup
    #[arg(long)]
    fetch_on_start: bool,

    /// Append tracing output to this file (the terminal belongs to the UI)
    #[arg(long, env = "WEATHER_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum FormComponentId {
    Form,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum FormContext {
    Main,
}

impl EventRoutingState<FormComponentId, FormContext> for AppState {
    fn focused(&self) -> Option<FormComponentId> {
        Some(FormComponentId::Form)
    }

    fn modal(&self) -> Option<FormComponentId> {
        None
    }

    fn binding_context(&self, _id: FormComponentId) -> FormContext {
        FormContext::Main
    }

    fn default_context(&self) -> FormContext {
        FormContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        base_url,
        mode,
        city,
        days,
        lat,
        lon,
        fetch_on_start,
        log_file,
        debug: debug_args,
    } = Args::parse();

    init_tracing(log_file.as_deref())?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    info!(%base_url, %mode, "starting weather form");

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState {
                mode,
                city: city.unwrap_or_default(),
                days,
                days_text: days.to_string(),
                latitude: lat.unwrap_or_default(),
                longitude: lon.unwrap_or_default(),
                focus: mode.fields().first().copied().unwrap_or_default(),
                ..AppState::new(base_url)
            })
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, fetch_on_start, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    info!("weather form closed");
    Ok(())
}

/// Install a file-backed subscriber. Without a file nothing is recorded.
fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(format!("tracing init failed: {e}")))
}

struct FormUi {
    app: WeatherApp,
}

impl FormUi {
    fn new() -> Self {
        Self {
            app: WeatherApp::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<FormComponentId>,
    ) {
        event_ctx.set_component_area(FormComponentId::Form, area);

        let props = WeatherAppProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.app.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = WeatherAppProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.app.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    fetch_on_start: bool,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(FormUi::new()));
    let mut bus: EventBus<AppState, Action, FormComponentId, FormContext> = EventBus::new();
    let keybindings: Keybindings<FormContext> = Keybindings::new();

    let ui_form = Rc::clone(&ui);
    bus.register(FormComponentId::Form, move |event, state| {
        ui_form.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    let initial_action = fetch_on_start.then_some(Action::WeatherFetch);

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_action,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchWeather { seq, query, url } => {
            let mode = query.mode();
            info!(seq, %mode, %url, "fetching weather");
            ctx.tasks().spawn("weather", async move {
                match api::fetch_report(&url, mode).await {
                    Ok(report) => {
                        debug!(seq, %mode, "weather loaded");
                        Action::WeatherDidLoad { seq, report }
                    }
                    Err(error) => {
                        warn!(seq, %mode, %error, "weather fetch failed");
                        Action::WeatherDidError {
                            seq,
                            message: api::FETCH_FAILED_MESSAGE.to_string(),
                        }
                    }
                }
            });
        }
    }
}
