use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use minicade::app::App;
use minicade::config::Config;
use minicade::engine::driver::DISPLAY_FRAME;
use minicade::event::{Event, EventHandler};
use minicade::{ui, Error, Result};

/// Upper bound on how long the loop blocks when idle, so resizes still redraw.
const IDLE_WAIT: Duration = Duration::from_millis(250);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .map_err(|source| Error::LogFile { path: config.log_path.clone(), source })?;
    let writer = Mutex::new(file);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        // The alternate screen would swallow the message otherwise.
        let _ = restore_terminal();
        let backtrace = std::backtrace::Backtrace::capture();
        error!(%info, ?backtrace, "panic");
        eprintln!("{info}");
    }));
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().map_err(Error::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(Error::Terminal)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(Error::Terminal)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

fn run(terminal: &mut Term, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let wait = app
            .time_until_next(Instant::now())
            .map_or(IDLE_WAIT, |d| d.min(DISPLAY_FRAME));
        match events.next(wait)? {
            Some(Event::Key(key)) => app.on_key(key, Instant::now()),
            Some(Event::Mouse(mouse)) => app.on_mouse(mouse, Instant::now()),
            Some(Event::Resize) | None => {}
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    init_tracing(&config)?;
    info!(?config, "config loaded");

    let mut terminal = setup_terminal()?;
    let mut app = App::new(&config);
    let events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &events);

    restore_terminal().map_err(Error::Terminal)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "exited with error");
    }
    info!("bye");
    result
}
