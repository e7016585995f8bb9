use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    sync::Arc,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use number_compare::{
    app_dirs::AppDirs,
    assets::AssetRegistry,
    clock::MonotonicClock,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::SessionDuration,
    App,
};

/// pick the larger number, fast
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction-time game: two numbers appear, pick the larger one as fast as you can before the clock runs out, then review your response times and export a share card."
)]
pub struct Cli {
    /// nickname to pre-fill on the start screen
    #[clap(short = 'n', long)]
    nickname: Option<String>,

    /// session length in seconds
    #[clap(short = 'd', long, value_enum)]
    duration: Option<SessionDuration>,

    /// directory of share card background images
    #[clap(long)]
    backgrounds: Option<PathBuf>,

    /// QR code image placed on the share card
    #[clap(long)]
    qr: Option<PathBuf>,

    /// TrueType/OpenType font for share card text
    #[clap(long)]
    font: Option<PathBuf>,

    /// where downloaded share cards are written
    #[clap(long)]
    export_dir: Option<PathBuf>,

    /// link printed on the share card
    #[clap(long)]
    share_url: Option<String>,

    /// seed for number pairs and background choice
    #[clap(long)]
    seed: Option<u64>,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// save the merged settings to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    /// Flags win over values loaded from the config file.
    fn apply_to(&self, config: &mut Config) {
        if let Some(nickname) = &self.nickname {
            config.nickname = Some(nickname.clone());
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(dir) = &self.backgrounds {
            config.backgrounds_dir = Some(dir.clone());
        }
        if let Some(qr) = &self.qr {
            config.qr_path = Some(qr.clone());
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = Some(dir.clone());
        }
        if let Some(url) = &self.share_url {
            config.share_url = Some(url.clone());
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply_to(&mut config);

    if cli.write_config {
        store.save(&config)?;
        log::info!("config written to {}", store.path().display());
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    log::info!("starting, config from {}", store.path().display());
    let assets = Arc::new(AssetRegistry::discover(&config));
    let mut app = App::new(config, assets, Box::new(MonotonicClock::new()), cli.seed);

    let mut guard = TerminalGuard::enter()?;
    let result = start_tui(&mut guard.terminal, &mut app);
    drop(guard);

    if let Err(e) = &result {
        log::error!("terminal loop failed: {e}");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    while !app.should_quit {
        terminal.draw(|f| {
            app.set_viewport(f.area());
            f.render_widget(&*app, f.area());
        })?;

        let event = runner.step();
        app.handle_event(event);
    }

    log::info!("exiting");
    Ok(())
}
