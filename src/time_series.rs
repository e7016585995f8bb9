/// One plotted answer: when it happened and how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    /// Whole seconds since the first answer.
    pub seconds: u64,
    pub response_ms: u64,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointColor {
    Correct,
    Incorrect,
}

impl PointColor {
    pub fn hex(&self) -> &'static str {
        match self {
            PointColor::Correct => "#4ade80",
            PointColor::Incorrect => "#ef4444",
        }
    }
}

impl ChartPoint {
    pub fn color(&self) -> PointColor {
        if self.correct {
            PointColor::Correct
        } else {
            PointColor::Incorrect
        }
    }
}

impl From<ChartPoint> for (f64, f64) {
    fn from(p: ChartPoint) -> Self {
        (p.seconds as f64, p.response_ms as f64)
    }
}

/// Value/color pair as consumed by the line-chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotValue {
    pub value: u64,
    pub color: PointColor,
}

/// Response-time series over the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn labels(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.seconds).collect()
    }

    pub fn values(&self) -> Vec<PlotValue> {
        self.points
            .iter()
            .map(|p| PlotValue {
                value: p.response_ms,
                color: p.color(),
            })
            .collect()
    }

    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().copied().map(Into::into).collect()
    }

    /// Coordinates of the points answered correctly (or not).
    pub fn coords_where(&self, correct: bool) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.correct == correct)
            .copied()
            .map(Into::into)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
