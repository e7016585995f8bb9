pub mod charting;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::app::{App, ShareState};
use crate::results::SessionReport;
use crate::session::{Session, SessionDuration, NICKNAME_MAX_CHARS};
use crate::ui::charting::{compute_chart_params, format_label};
use crate::ui::screen::current_screen;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const PANEL_SPACING: u16 = 2;
/// Below this many seconds the countdown turns red.
const LOW_TIME_SECS: u64 = 10;
/// Accuracy at or above this is shown in green.
const GOOD_ACCURACY_PCT: f64 = 80.0;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        current_screen(&self.state).render(self, area, buf);
    }
}

/// Regions of the playing screen. The two panels double as click targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayingLayout {
    pub timer: Rect,
    pub progress: Rect,
    pub helper: Rect,
    pub left: Rect,
    pub right: Rect,
    pub hint: Rect,
}

pub fn playing_layout(area: Rect) -> PlayingLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // time left
            Constraint::Length(1), // gauge
            Constraint::Length(1), // answered counter
            Constraint::Length(1), // padding
            Constraint::Min(3),    // number panels
            Constraint::Length(1), // legend
        ])
        .split(area);

    let panels = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .spacing(PANEL_SPACING)
        .split(chunks[4]);

    PlayingLayout {
        timer: chunks[0],
        progress: chunks[1],
        helper: chunks[2],
        left: panels[0],
        right: panels[1],
        hint: chunks[5],
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

pub(crate) fn render_start(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // tagline
            Constraint::Min(1),
            Constraint::Length(1), // nickname
            Constraint::Length(1), // duration
            Constraint::Length(1), // validation error
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Number Compare",
        bold().fg(Color::Magenta),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "Pick the larger number as fast as you can",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let nickname = &app.form.nickname;
    let fill = NICKNAME_MAX_CHARS.saturating_sub(nickname.width());
    Paragraph::new(Line::from(vec![
        Span::styled("Nickname  ", dim_bold()),
        Span::styled(nickname.clone(), bold().fg(Color::Cyan)),
        Span::styled("_".repeat(fill), dim_bold()),
        Span::styled(
            format!("  {}/{NICKNAME_MAX_CHARS}", nickname.chars().count()),
            dim_bold(),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let choices = SessionDuration::ALL.iter().map(|d| {
        if *d == app.form.duration {
            Span::styled(format!("[{}s]", d.as_secs()), bold().fg(Color::Green))
        } else {
            Span::styled(format!(" {}s ", d.as_secs()), dim_bold())
        }
    });
    let mut duration_line = vec![Span::styled("Duration  ", dim_bold())];
    duration_line.extend(choices);
    Paragraph::new(Line::from(duration_line))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    if let Some(error) = &app.form.error {
        Paragraph::new(Span::styled(error.clone(), bold().fg(Color::Red)))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled(
        "(enter) start / (↑↓) duration / (esc)ape",
        italic(),
    ))
    .render(chunks[7], buf);
}

pub(crate) fn render_playing(session: &Session, area: Rect, buf: &mut Buffer) {
    let layout = playing_layout(area);
    let time_left = session.time_left_secs();

    let timer_style = if time_left < LOW_TIME_SECS {
        bold().fg(Color::Red)
    } else {
        bold()
    };
    Paragraph::new(Span::styled(format!("Time left {time_left}s"), timer_style))
        .alignment(Alignment::Center)
        .render(layout.timer, buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(session.remaining_ratio().clamp(0.0, 1.0))
        .label("")
        .render(layout.progress, buf);

    let helper = if session.has_started() {
        format!(
            "Answered {}, correct {}",
            session.answered(),
            session.correct_answers()
        )
    } else {
        "The clock starts with your first answer".to_string()
    };
    Paragraph::new(Span::styled(helper, dim_bold()))
        .alignment(Alignment::Center)
        .render(layout.helper, buf);

    let pair = session.pair();
    render_panel("←", pair.left, layout.left, buf);
    render_panel("→", pair.right, layout.right, buf);

    Paragraph::new(Span::styled(
        "(←) left / (→) right / click a number / (esc) give up",
        italic(),
    ))
    .render(layout.hint, buf);
}

fn render_panel(title: &str, value: u8, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .title(Line::from(title).centered())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 {
        return;
    }
    let row = Rect {
        y: inner.y + inner.height / 2,
        height: 1,
        ..inner
    };
    Paragraph::new(Span::styled(value.to_string(), bold()))
        .alignment(Alignment::Center)
        .render(row, buf);
}

pub(crate) fn render_results(app: &App, report: &SessionReport, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(2), // share status
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "{} finished the {}s challenge",
            report.nickname,
            report.duration.as_secs()
        ),
        bold().fg(Color::Magenta),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let series = &report.series;
    let bounds = compute_chart_params(series, report.duration.as_secs());
    let line = series.coords();
    let hits = series.coords_where(true);
    let misses = series.coords_where(false);
    let datasets = vec![
        Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&line),
        Dataset::default()
            .marker(Marker::Dot)
            .style(Style::default().fg(Color::Green))
            .graph_type(GraphType::Scatter)
            .data(&hits),
        Dataset::default()
            .marker(Marker::Dot)
            .style(Style::default().fg(Color::Red))
            .graph_type(GraphType::Scatter)
            .data(&misses),
    ];

    let axis_labels = |[lo, hi]: [f64; 2]| {
        vec![
            Span::styled(format_label(lo), bold()),
            Span::styled(format_label(hi), bold()),
        ]
    };
    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds(bounds.x)
                .labels(axis_labels(bounds.x)),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .bounds(bounds.y)
                .labels(axis_labels(bounds.y)),
        )
        .render(chunks[1], buf);

    let summary = &report.summary;
    let accuracy_style = if summary.accuracy_pct >= GOOD_ACCURACY_PCT {
        bold().fg(Color::Green)
    } else {
        bold().fg(Color::Red)
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{}/{} correct   ", summary.correct_count, summary.total),
            bold(),
        ),
        Span::styled(format!("{}% acc", summary.accuracy_label()), accuracy_style),
        Span::styled(
            format!(
                "   {} ms avg   {}s",
                summary.avg_response_ms,
                report.duration.as_secs()
            ),
            bold(),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let mut share_lines = vec![share_line(&app.share)];
    if let Some(status) = &app.status {
        share_lines.push(Line::from(Span::styled(status.clone(), italic())));
    }
    Paragraph::new(share_lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let mut actions = vec!["(r)estart", "(s)hare"];
    if matches!(app.share, ShareState::Ready(_)) {
        actions.push("(d)ownload");
    }
    if app.exported.is_some() && Browser::is_available() {
        actions.push("(o)pen");
    }
    actions.push("(esc)ape");
    Paragraph::new(Span::styled(actions.iter().join(" / "), italic())).render(chunks[5], buf);
}

fn share_line(share: &ShareState) -> Line<'static> {
    match share {
        ShareState::Idle => Line::from(Span::styled(
            "Press (s) to create a share card",
            dim_bold(),
        )),
        ShareState::Working => Line::from(Span::styled(
            "Generating share image...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )),
        ShareState::Ready(image) => Line::from(Span::styled(
            format!(
                "Share card ready ({}x{}, {})",
                image.width, image.height, image.background
            ),
            bold().fg(Color::Green),
        )),
        ShareState::Failed(message) => {
            Line::from(Span::styled(message.clone(), bold().fg(Color::Red)))
        }
    }
}
