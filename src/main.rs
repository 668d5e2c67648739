//! Postaqui - Shipping Quote Wizard
//!
//! Terminal front end: sender, receiver and package forms, a freight quote
//! and a tracking code, talking to the remote pricing service.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use postaqui::application::App;
use postaqui::infrastructure::{logging, Dispatcher, HttpGateway, ServiceConfig};
use postaqui::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(100);

/// Entry point for the wizard.
///
/// Loads the configuration, starts file logging, builds the HTTP gateway and
/// runs the event loop until the user quits. The terminal is restored before
/// any loop error is returned.
///
/// # Errors
///
/// Returns an error if a `POSTAQUI_*` variable is invalid, if the log
/// directory cannot be created, if the HTTP client cannot be built, or if a
/// terminal operation fails.
fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("loading configuration")?;
    let _guard = logging::init(&config.log_dir)?;
    info!(
        base_url = %config.base_url,
        address_lookup_url = %config.address_lookup_url,
        timeout_secs = config.timeout_secs,
        "starting postaqui"
    );

    let gateway = Arc::new(HttpGateway::new(&config).context("building HTTP client")?);
    let mut dispatcher = Dispatcher::new(gateway.clone(), gateway);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, &mut dispatcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "terminal loop failed");
    }
    info!("exiting");
    res.map_err(Into::into)
}

/// Draws, applies finished remote calls and handles key presses until quit.
///
/// # Arguments
///
/// * `terminal` - Terminal interface for rendering
/// * `app` - Wizard state
/// * `dispatcher` - Runs effects and hands their completions back
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
) -> io::Result<()> {
    loop {
        for completion in dispatcher.drain() {
            app.apply(completion);
        }

        terminal.draw(|f| render_ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(effect) = InputHandler::handle_key_event(app, key.code, key.modifiers) {
                        dispatcher.dispatch(effect);
                    }
                }
            }
        }
    }
}
