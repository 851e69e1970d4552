use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use psistat::cadence::Cadence;
use psistat::config::{Overrides, Settings};
use psistat::data::{Engine, Stamp, Window};
use psistat::{events, logging, source, ui, App};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "psistat")]
#[command(about = "Live view of Linux pressure stall information with threshold events")]
struct Args {
    /// Event threshold in percent [1-99, default 20]
    #[arg(short, long = "threshold-pct", value_parser = clap::value_parser!(u8).range(1..=99))]
    threshold: Option<u8>,

    /// Window driving events, in seconds: 1, 3, 10, 60 or 300 [default 10]
    #[arg(short, long)]
    interval: Option<Window>,

    /// Show only the events that fit on screen
    #[arg(short, long)]
    brief: bool,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the cpu, io and memory pressure files
    #[arg(long)]
    pressure_dir: Option<PathBuf>,

    /// Append logs to this file (filter with PSISTAT_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the event log after quitting
    #[arg(long)]
    dump_on_exit: bool,

    /// Return to the display right after a dump instead of waiting for Enter
    #[arg(long)]
    no_dump_pause: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            threshold: self.threshold,
            interval: self.interval.map(|w| w.secs()),
            brief: self.brief.then_some(true),
            pressure_dir: self.pressure_dir.clone(),
            log_file: self.log_file.clone(),
            dump_pause: self.no_dump_pause.then_some(false),
            dump_on_exit: self.dump_on_exit.then_some(true),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    logging::init(settings.log_file.as_deref())?;
    let state = settings.initial_state()?;

    // Open every source before touching the terminal so failures print plainly.
    let sources = source::open_all(&settings.pressure_dir)
        .with_context(|| format!("pressure files unavailable in {}", settings.pressure_dir.display()))?;
    info!(dir = %settings.pressure_dir.display(), ?state, "starting");

    let mut app = App::new(Engine::new(sources), state);
    let result = run_tui(&mut app, &settings);

    if let Err(ref e) = result {
        error!(error = %e, "exiting on error");
    }
    if settings.dump_on_exit {
        app.engine.log().write_plain(&mut io::stdout().lock())?;
    }
    result
}

/// Set up the terminal, run the loop, and restore the terminal on every path.
fn run_tui(app: &mut App, settings: &Settings) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app, settings);
    finish(result, restore_terminal(&mut terminal))
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// A loop error outranks a failed restore; the restore error is only logged then.
fn finish(result: Result<()>, restored: Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(e), Err(restore)) => {
            error!(error = %restore, "failed to restore terminal");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}

fn run_app(terminal: &mut Term, app: &mut App, settings: &Settings) -> Result<()> {
    let mut cadence = Cadence::default();

    while app.running() {
        let now = Instant::now();
        if cadence.is_due(now) {
            app.sample(Stamp::now()).context("pressure sampling failed")?;
            cadence.mark(now);
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // The only blocking point: wait out the rest of the cycle for a key.
        if let Some(Event::Key(key)) = events::poll_event(cadence.wait(Instant::now()))? {
            if let Some(action) = events::map_key(&app.state, key) {
                app.apply(action);
            }
        }

        if app.take_dump_request() {
            dump_events(terminal, app, settings.dump_pause)?;
        }
    }

    info!(events = app.engine.log().len(), "quit requested");
    Ok(())
}

/// Leave the display, print the event log oldest first, then come back.
fn dump_events(terminal: &mut Term, app: &App, pause: bool) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    {
        let mut out = io::stdout().lock();
        app.engine.log().write_plain(&mut out)?;
        writeln!(out, "-- {} events --", app.engine.log().len())?;
        if pause {
            write!(out, "Press ENTER to return to psistat ")?;
            out.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
        }
    }

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}
