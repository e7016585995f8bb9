use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use number_compare::app::{App, AppState};
use number_compare::assets::AssetRegistry;
use number_compare::clock::ManualClock;
use number_compare::config::Config;
use number_compare::round::{RoundGenerator, Side};
use number_compare::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use number_compare::session::{InputOutcome, Nickname, Session, SessionDuration};
use number_compare::timer::TimerEvent;

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn app(clock: &ManualClock, duration: SessionDuration) -> App {
    App::new(
        Config {
            duration,
            nickname: Some("ada".into()),
            ..Config::default()
        },
        Arc::new(AssetRegistry::default()),
        Box::new(clock.clone()),
        Some(42),
    )
}

// Headless run of the whole app through Runner/TestEventSource without a TTY.
#[test]
fn headless_session_reaches_results() {
    let clock = ManualClock::new(0);
    let mut app = app(&clock, SessionDuration::Ten);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Left)).unwrap();
    tx.send(key(KeyCode::Right)).unwrap();

    for _ in 0..3 {
        let event = runner.step();
        app.handle_event(event);
        clock.advance(250);
    }
    assert_eq!(app.state, AppState::Playing);
    assert_eq!(app.session.as_ref().unwrap().answered(), 2);

    // no more input: ticks alone finish the session
    clock.advance(10_000);
    let event = runner.step();
    assert!(matches!(event, AppEvent::Tick));
    app.handle_event(event);

    assert_eq!(app.state, AppState::Finished);
    assert!(app.session.is_none());
    let report = app.report.as_ref().unwrap();
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.history[0].response_time_ms, 0);
    assert_eq!(report.history[1].response_time_ms, 250);
    assert_eq!(report.series.points.len(), 1);
}

// The countdown is measured from the first answer, not from entering the screen.
#[test]
fn timer_starts_on_first_answer() {
    let mut session = Session::new(
        Nickname::parse("ada").unwrap(),
        SessionDuration::Ten,
        RoundGenerator::seeded(9),
    );
    assert!(session.on_tick(3_000).is_none());
    assert_eq!(session.time_left_secs(), 10);

    assert!(matches!(
        session.dispatch(Side::Left, 3_000),
        InputOutcome::Accepted { .. }
    ));
    assert!(session.on_tick(7_999).is_none());
    assert_eq!(session.time_left_secs(), 6);
    assert!(session.on_tick(12_999).is_none());
    assert_eq!(session.on_tick(13_000), Some(TimerEvent::Expired));
    assert_eq!(session.on_tick(14_000), None);
    assert_eq!(session.dispatch(Side::Right, 14_000), InputOutcome::Ignored);
    assert_eq!(session.into_history().len(), 1);
}

// A steady stream of key presses cannot hold the session open past its end.
#[test]
fn continuous_input_does_not_starve_expiry() {
    let clock = ManualClock::new(0);
    let mut app = app(&clock, SessionDuration::Ten);
    app.handle_event(key(KeyCode::Enter));

    for _ in 0..200 {
        app.handle_event(key(KeyCode::Right));
        clock.advance(60);
    }

    assert_eq!(app.state, AppState::Finished);
    let report = app.report.as_ref().unwrap();
    assert!(report.history.iter().all(|r| r.time_offset_ms < 10_000));
    assert_eq!(report.history.len(), 167);
}

#[test]
fn second_round_starts_fresh() {
    let clock = ManualClock::new(0);
    let mut app = app(&clock, SessionDuration::Ten);
    app.handle_event(key(KeyCode::Enter));
    app.handle_event(key(KeyCode::Left));
    clock.advance(10_000);
    app.handle_event(AppEvent::Tick);
    assert_eq!(app.state, AppState::Finished);

    app.handle_event(key(KeyCode::Char('r')));
    app.handle_event(key(KeyCode::Up));
    app.handle_event(key(KeyCode::Enter));

    let session = app.session.as_ref().unwrap();
    assert_eq!(session.duration(), SessionDuration::Thirty);
    assert_eq!(session.answered(), 0);
    assert!(!session.has_started());
    assert!(app.report.is_none());
}
