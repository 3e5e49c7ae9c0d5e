use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use foolcools::{
    app::{App, AppAction, AppSettings, AppState},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, FocusPreset},
    error::FocusError,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    scheduler::Clock,
    search::parse_targets,
    session::SessionEvent,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// calm focus timer with guided breathing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A focus timer that paces your breathing (4s in, 2s hold, 4s out) alongside a countdown, with an optional letter-search warm-up to gather attention first."
)]
pub struct Cli {
    /// focus duration in minutes
    #[clap(short = 'd', long, value_enum)]
    duration: Option<FocusPreset>,

    /// letters to hide in the warm-up grid, e.g. "fc"
    #[clap(short = 't', long)]
    targets: Option<String>,

    /// skip the letter-search warm-up and start focusing right away
    #[clap(long)]
    skip_warmup: bool,

    /// write logs to this file (level from RUST_LOG, default info)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer CLI flags over the persisted config
    fn to_settings(&self, cfg: &Config) -> Result<AppSettings, FocusError> {
        let mut settings = AppSettings::from_config(cfg);
        if let Some(preset) = self.duration {
            settings.preset = preset;
        }
        if let Some(ref targets) = self.targets {
            settings.targets = parse_targets(targets)?;
        }
        if self.skip_warmup {
            settings.skip_warmup = true;
        }
        Ok(settings)
    }

    fn log_path(&self) -> Option<PathBuf> {
        match self.log_file {
            Some(ref path) => Some(path.clone()),
            None if std::env::var_os("RUST_LOG").is_some() => AppDirs::log_path(),
            None => None,
        }
    }
}

/// Logs go to a file since the terminal belongs to the UI
fn init_logging(path: Option<PathBuf>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("foolcools=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_path())?;

    let store = FileConfigStore::new();
    let settings = match cli.to_settings(&store.load()) {
        Ok(settings) => settings,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };
    info!(?settings, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_store(settings, store);
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T, C>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                let before = app.state;
                app.on_tick(runner.now_ms());

                // Only animated screens need a redraw on every tick, plus any
                // tick that moved to another screen (summary auto-dismiss)
                if before != app.state
                    || matches!(app.state, AppState::Focus | AppState::Summary)
                {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                let now = runner.now_ms();
                // fire anything already due so a key never acts on stale state
                let completed = app
                    .on_tick(now)
                    .iter()
                    .any(|e| matches!(e, SessionEvent::Completed(_)));

                // a key racing the session's end must not dismiss the summary unseen
                if completed && !App::is_quit_key(&key) {
                    terminal.draw(|f| ui(app, f))?;
                    continue;
                }
                if app.on_key(key, now)? == AppAction::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
