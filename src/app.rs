use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::layout::Rect;
use webbrowser::Browser;

use crate::assets::AssetRegistry;
use crate::clock::Clock;
use crate::config::Config;
use crate::export::save_share_image;
use crate::input::{side_for_click, side_for_key, ClickTargets};
use crate::results::SessionReport;
use crate::round::{RoundGenerator, Side};
use crate::runtime::AppEvent;
use crate::session::{InputOutcome, Nickname, Session, SessionDuration, NICKNAME_MAX_CHARS};
use crate::share::{ShareCard, ShareComposer, ShareError, ShareImage};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    Playing,
    Finished,
}

/// Nickname and duration being entered on the start screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartForm {
    pub nickname: String,
    pub duration: SessionDuration,
    pub error: Option<String>,
}

impl StartForm {
    fn push(&mut self, c: char) {
        if self.nickname.chars().count() < NICKNAME_MAX_CHARS {
            self.nickname.push(c);
        }
        self.error = None;
    }

    fn pop(&mut self) {
        self.nickname.pop();
        self.error = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShareState {
    #[default]
    Idle,
    /// A worker is composing; further requests are ignored.
    Working,
    Ready(ShareImage),
    Failed(String),
}

type ShareOutcome = Result<ShareImage, ShareError>;

/// Screen routing and everything the three screens read.
pub struct App {
    pub state: AppState,
    pub form: StartForm,
    pub session: Option<Session>,
    pub report: Option<SessionReport>,
    pub share: ShareState,
    /// Last export message shown under the results.
    pub status: Option<String>,
    pub exported: Option<PathBuf>,
    pub should_quit: bool,
    click_targets: ClickTargets,
    config: Config,
    assets: Arc<AssetRegistry>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    share_rx: Option<Receiver<ShareOutcome>>,
    /// At most one composition thread runs at a time, across sessions.
    share_worker: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        config: Config,
        assets: Arc<AssetRegistry>,
        clock: Box<dyn Clock>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let form = StartForm {
            nickname: config.nickname.clone().unwrap_or_default(),
            duration: config.duration,
            error: None,
        };

        Self {
            state: AppState::Start,
            form,
            session: None,
            report: None,
            share: ShareState::Idle,
            status: None,
            exported: None,
            should_quit: false,
            click_targets: ClickTargets::default(),
            config,
            assets,
            clock,
            rng,
            share_rx: None,
            share_worker: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recomputes where the number panels are for pointer input.
    pub fn set_viewport(&mut self, area: Rect) {
        let layout = ui::playing_layout(area);
        self.click_targets = ClickTargets {
            left: layout.left,
            right: layout.right,
        };
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        let now = self.clock.now_ms();
        self.advance(now);

        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => self.on_key(key, now),
            AppEvent::Mouse(mouse) => self.on_mouse(mouse, now),
        }
    }

    /// Runs the countdown and collects a finished share job. Called before
    /// every event so expiry is never starved by a stream of key presses.
    fn advance(&mut self, now: u64) {
        let expired = self
            .session
            .as_mut()
            .and_then(|session| session.on_tick(now))
            .is_some();
        if expired {
            self.finish_session();
        }
        self.poll_share();
    }

    fn on_key(&mut self, key: KeyEvent, now: u64) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Start => self.on_start_key(key),
            AppState::Playing => {
                if key.code == KeyCode::Esc {
                    self.abandon_session();
                } else if let Some(side) = side_for_key(&key) {
                    self.answer(side, now);
                }
            }
            AppState::Finished => self.on_results_key(key),
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: u64) {
        if self.state != AppState::Playing {
            return;
        }
        if let Some(side) = side_for_click(&mouse, &self.click_targets) {
            self.answer(side, now);
        }
    }

    fn on_start_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.start_session(),
            KeyCode::Up | KeyCode::Tab => self.form.duration = self.form.duration.next(),
            KeyCode::Down | KeyCode::BackTab => {
                self.form.duration = self.form.duration.previous()
            }
            KeyCode::Backspace => self.form.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.push(c)
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('s') => self.request_share(),
            KeyCode::Char('d') => self.download(),
            KeyCode::Char('o') => self.open_export(),
            _ => {}
        }
    }

    pub fn start_session(&mut self) {
        let nickname = match Nickname::parse(&self.form.nickname) {
            Ok(nickname) => nickname,
            Err(e) => {
                self.form.error = Some(e.to_string());
                return;
            }
        };

        let generator = RoundGenerator::seeded(self.rng.gen());
        log::info!(
            "session started for {nickname}, {}s",
            self.form.duration
        );
        self.form.nickname = nickname.to_string();
        self.form.error = None;
        self.session = Some(Session::new(nickname, self.form.duration, generator));
        self.report = None;
        self.share = ShareState::Idle;
        self.share_rx = None;
        self.status = None;
        self.exported = None;
        self.state = AppState::Playing;
    }

    fn answer(&mut self, side: Side, now: u64) {
        if let Some(session) = self.session.as_mut() {
            if session.dispatch(side, now) == InputOutcome::Ignored {
                log::debug!("input after expiry ignored");
            }
        }
    }

    fn finish_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let report = SessionReport::from_session(session);
        log::info!(
            "session finished: {}/{} correct, {}% accuracy, {} ms average",
            report.summary.correct_count,
            report.summary.total,
            report.summary.accuracy_label(),
            report.summary.avg_response_ms
        );
        self.report = Some(report);
        self.state = AppState::Finished;
    }

    fn abandon_session(&mut self) {
        if self.session.take().is_some() {
            log::info!("session abandoned");
        }
        self.state = AppState::Start;
    }

    fn restart(&mut self) {
        self.report = None;
        self.share = ShareState::Idle;
        self.share_rx = None;
        self.status = None;
        self.exported = None;
        self.state = AppState::Start;
    }

    pub fn request_share(&mut self) {
        if self.share == ShareState::Working || self.report.is_none() {
            return;
        }
        if self.share_worker_busy() {
            log::info!("share requested while the previous worker is still running");
            self.status = Some("A share image is still being generated, try again shortly".into());
            return;
        }
        let Some(report) = &self.report else {
            return;
        };

        let card = ShareCard::from_report(report, self.config.share_url.clone());
        let mut composer = ShareComposer::seeded(Arc::clone(&self.assets), self.rng.gen());
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            // receiver may be gone if the results screen was left
            let _ = tx.send(composer.compose(&card));
        });

        self.share_worker = Some(worker);
        self.share_rx = Some(rx);
        self.share = ShareState::Working;
        self.status = None;
    }

    /// Joins the share worker once it has exited; true while it still runs.
    fn share_worker_busy(&mut self) -> bool {
        match self.share_worker.take() {
            Some(worker) if !worker.is_finished() => {
                self.share_worker = Some(worker);
                true
            }
            Some(worker) => {
                if worker.join().is_err() {
                    log::error!("share worker panicked");
                }
                false
            }
            None => false,
        }
    }

    pub fn poll_share(&mut self) {
        // reap a worker that has exited
        self.share_worker_busy();
        let outcome = match &self.share_rx {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match outcome {
            Ok(Ok(image)) => {
                self.share_rx = None;
                self.share = ShareState::Ready(image);
            }
            Ok(Err(e)) => {
                self.share_rx = None;
                log::warn!("share card failed: {e}");
                self.share = ShareState::Failed(e.user_message().to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.share_rx = None;
                log::error!("share worker exited without a result");
                let e = ShareError::RenderFailure("worker exited".to_string());
                self.share = ShareState::Failed(e.user_message().to_string());
            }
        }
    }

    fn download(&mut self) {
        let ShareState::Ready(image) = &self.share else {
            return;
        };
        match save_share_image(&self.config.export_dir(), image, Utc::now()) {
            Ok(path) => {
                self.status = Some(format!("Saved {}", path.display()));
                self.exported = Some(path);
            }
            Err(e) => {
                log::warn!("export failed: {e}");
                self.status = Some(format!("Could not save image: {e}"));
            }
        }
    }

    fn open_export(&mut self) {
        let Some(path) = &self.exported else {
            return;
        };
        if !Browser::is_available() {
            return;
        }
        if let Err(e) = webbrowser::open(&path.to_string_lossy()) {
            log::warn!("cannot open {}: {e}", path.display());
            self.status = Some(format!("Could not open image: {e}"));
        }
    }
}
