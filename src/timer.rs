use crate::session::SessionDuration;

const MS_PER_SEC: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for the first accepted answer; the clock is frozen.
    Idle,
    Running {
        started_at: u64,
    },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Expired,
}

/// Countdown for one play-through.
///
/// The countdown begins on the first accepted answer, not when the playing
/// screen is shown, and loses one second per whole second elapsed since then.
/// `on_tick` reports [`TimerEvent::Expired`] exactly once.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    duration_secs: u64,
    time_left_secs: u64,
    state: TimerState,
}

impl SessionTimer {
    pub fn new(duration: SessionDuration) -> Self {
        let duration_secs = duration.as_secs();
        Self {
            duration_secs,
            time_left_secs: duration_secs,
            state: TimerState::Idle,
        }
    }

    /// Moves `Idle -> Running`. Returns false if the timer was already started.
    pub fn start(&mut self, now: u64) -> bool {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running { started_at: now };
                true
            }
            _ => false,
        }
    }

    pub fn on_tick(&mut self, now: u64) -> Option<TimerEvent> {
        let TimerState::Running { started_at } = self.state else {
            return None;
        };

        let elapsed_secs = now.saturating_sub(started_at) / MS_PER_SEC;
        self.time_left_secs = self
            .duration_secs
            .saturating_sub(elapsed_secs)
            .min(self.time_left_secs);

        if self.time_left_secs == 0 {
            self.state = TimerState::Expired;
            return Some(TimerEvent::Expired);
        }
        None
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn has_started(&self) -> bool {
        !matches!(self.state, TimerState::Idle)
    }

    pub fn is_expired(&self) -> bool {
        self.time_left_secs == 0
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Fraction of the round still remaining, for the progress gauge.
    pub fn remaining_ratio(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.time_left_secs as f64 / self.duration_secs as f64
    }
}
