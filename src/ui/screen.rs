use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};
use crate::ui::{render_playing, render_results, render_start};

/// A UI Screen boundary: draws one application state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Nickname and duration entry
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_start(app, area, buf);
    }
}

pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        match &app.session {
            Some(session) => render_playing(session, area, buf),
            None => render_start(app, area, buf),
        }
    }
}

/// Summary, chart and share controls
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(report) = &app.report {
            render_results(app, report, area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Start => Box::new(StartScreen),
        AppState::Playing => Box::new(PlayingScreen),
        AppState::Finished => Box::new(ResultsScreen),
    }
}
