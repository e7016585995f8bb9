use rand::Rng;

use crate::recorder::AnswerRecord;
use crate::session::{Nickname, Session, SessionDuration};
use crate::time_series::{ChartPoint, ChartSeries};
use crate::util::{mean, percentage, round_to};

/// Headline numbers for a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub correct_count: usize,
    /// Percentage rounded to one decimal; 0 for an empty session.
    pub accuracy_pct: f64,
    /// Mean response time rounded to whole milliseconds; 0 for an empty session.
    pub avg_response_ms: u64,
}

impl Summary {
    pub fn accuracy_label(&self) -> String {
        format!("{:.1}", self.accuracy_pct)
    }
}

pub fn summarize(history: &[AnswerRecord]) -> Summary {
    let total = history.len();
    let correct_count = history.iter().filter(|r| r.correct).count();

    let accuracy_pct = percentage(correct_count, total)
        .map(|pct| round_to(pct, 1))
        .unwrap_or(0.0);

    let response_times: Vec<f64> = history
        .iter()
        .map(|r| r.response_time_ms as f64)
        .collect();
    let avg_response_ms = mean(&response_times)
        .map(|avg| round_to(avg, 0) as u64)
        .unwrap_or(0);

    Summary {
        total,
        correct_count,
        accuracy_pct,
        avg_response_ms,
    }
}

/// Response times to plot. A zero-latency first answer is the baseline
/// placeholder, not a measurement, so it is left out; any later zero is kept.
pub fn chart_series(history: &[AnswerRecord]) -> ChartSeries {
    let points = history
        .iter()
        .enumerate()
        .filter(|(idx, r)| !(*idx == 0 && r.response_time_ms == 0))
        .map(|(_, r)| ChartPoint {
            seconds: (r.time_offset_ms + 500) / 1000,
            response_ms: r.response_time_ms,
            correct: r.correct,
        })
        .collect();

    ChartSeries { points }
}

/// Everything the results screen and the share card need.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub nickname: Nickname,
    pub duration: SessionDuration,
    pub history: Vec<AnswerRecord>,
    pub summary: Summary,
    pub series: ChartSeries,
}

impl SessionReport {
    pub fn new(nickname: Nickname, duration: SessionDuration, history: Vec<AnswerRecord>) -> Self {
        let summary = summarize(&history);
        let series = chart_series(&history);
        Self {
            nickname,
            duration,
            history,
            summary,
            series,
        }
    }

    /// Closes out a session under the nickname it was started with.
    pub fn from_session<R: Rng>(session: Session<R>) -> Self {
        let nickname = session.nickname().clone();
        let duration = session.duration();
        Self::new(nickname, duration, session.into_history())
    }
}
