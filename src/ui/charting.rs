use itertools::{Itertools, MinMaxResult};

use crate::time_series::ChartSeries;

const Y_STEP_MS: f64 = 100.0;

/// Axis bounds for the response time chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// X spans the whole session (or the last point if later), Y is snapped to
/// 100 ms steps around the observed response times.
pub fn compute_chart_params(series: &ChartSeries, duration_secs: u64) -> ChartBounds {
    let last_second = series.points.last().map(|p| p.seconds).unwrap_or(0);
    let x_max = duration_secs.max(last_second).max(1) as f64;

    let y = match series.points.iter().map(|p| p.response_ms).minmax() {
        MinMaxResult::NoElements => [0.0, Y_STEP_MS],
        MinMaxResult::OneElement(v) => snap(v, v),
        MinMaxResult::MinMax(lo, hi) => snap(lo, hi),
    };

    ChartBounds { x: [0.0, x_max], y }
}

fn snap(lo: u64, hi: u64) -> [f64; 2] {
    let lo = (lo as f64 / Y_STEP_MS).floor() * Y_STEP_MS;
    let mut hi = (hi as f64 / Y_STEP_MS).ceil() * Y_STEP_MS;
    if hi <= lo {
        hi = lo + Y_STEP_MS;
    }
    [lo, hi]
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
