use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use sport_timer::{
    app::App,
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{ConfigStore, FileConfigStore, ThemeName},
    effects::EffectRunner,
    file_store::FsFileStore,
    logging::init_logging,
    store::SessionLogStore,
    timer::format_clock,
    ui,
};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};

// ============================================================================
// Type Aliases & Constants
// ============================================================================

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const FRAME_RATE: Duration = Duration::from_millis(50);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "Sport Tracker - a terminal stopwatch with a rolling week of sessions")]
struct Args {
    /// Color theme (dark or light)
    #[arg(short = 't', long)]
    theme: Option<ThemeName>,
    /// Disable audio cues
    #[arg(long)]
    no_sound: bool,
    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,
    /// Directory holding sessions.json, config.json and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Print the stored sessions and exit
    #[arg(long)]
    history: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let dirs = args.data_dir.as_ref().map(AppDirs::at).unwrap_or_else(AppDirs::resolve);
    let store = SessionLogStore::open(dirs.sessions());

    if args.history {
        return print_history(&store);
    }

    if let Err(e) = init_logging(&args.log_level, &dirs.log()) {
        eprintln!("logging disabled: {e}");
    }

    let config_store = FileConfigStore::with_path(dirs.config());
    let config = config_store.load();
    info!(data_dir = %dirs.root().display(), "starting");

    // CLI overrides apply to this run only and are never written back
    let mut effects = EffectRunner::desktop();
    effects.sound_enabled = config.sound_enabled && !args.no_sound;
    effects.notifications_enabled = config.notifications_enabled && !args.no_notify;

    let mut app = App::new(config, Box::new(config_store), store, effects, Box::new(SystemClock));
    if let Some(theme) = args.theme {
        info!(%theme, "theme overridden from command line");
        app.theme = theme;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!(error = %e, "exited with error");
    }
    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<FsFileStore>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let now = Instant::now();
        let timeout = app
            .ticker()
            .remaining(now)
            .map_or(FRAME_RATE, |d| d.min(FRAME_RATE));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key, Instant::now()) {
                    info!("quit");
                    return Ok(());
                }
            }
        }

        app.update(Instant::now());
    }
}

fn print_history(store: &SessionLogStore) -> Result<()> {
    let log = store.load()?;
    if log.is_empty() {
        println!("No sessions recorded in {}", store.path().display());
        return Ok(());
    }
    for entry in log.entries() {
        let when = entry.completed_at.with_timezone(&chrono::Local);
        println!(
            "{}  {}",
            when.format("%Y-%m-%d %H:%M"),
            format_clock(entry.duration_seconds)
        );
    }
    println!(
        "{} sessions, {} total",
        log.len(),
        format_clock(log.total_seconds())
    );
    Ok(())
}
