use clap::ValueEnum;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recorder::{AnswerRecord, AnswerRecorder};
use crate::round::{NumberPair, RoundGenerator, Side};
use crate::timer::{SessionTimer, TimerEvent};

pub const NICKNAME_MAX_CHARS: usize = 16;

/// Round length; only these three are offered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(try_from = "u64", into = "u64")]
pub enum SessionDuration {
    #[value(name = "10")]
    #[strum(to_string = "10")]
    Ten,
    #[value(name = "30")]
    #[strum(to_string = "30")]
    Thirty,
    #[default]
    #[value(name = "60")]
    #[strum(to_string = "60")]
    Sixty,
}

impl SessionDuration {
    pub const ALL: [SessionDuration; 3] = [Self::Ten, Self::Thirty, Self::Sixty];

    pub fn as_secs(&self) -> u64 {
        match self {
            Self::Ten => 10,
            Self::Thirty => 30,
            Self::Sixty => 60,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Ten => Self::Thirty,
            Self::Thirty => Self::Sixty,
            Self::Sixty => Self::Ten,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::Ten => Self::Sixty,
            Self::Thirty => Self::Ten,
            Self::Sixty => Self::Thirty,
        }
    }
}

impl TryFrom<u64> for SessionDuration {
    type Error = String;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_secs() == secs)
            .ok_or_else(|| format!("unsupported duration {secs}s, expected 10, 30 or 60"))
    }
}

impl From<SessionDuration> for u64 {
    fn from(d: SessionDuration) -> Self {
        d.as_secs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("please enter a nickname")]
    Empty,
    #[error("nickname must be at most {NICKNAME_MAX_CHARS} characters")]
    TooLong,
}

/// Trimmed, non-empty player name of at most 16 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    pub fn parse(raw: &str) -> Result<Self, NicknameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NicknameError::Empty);
        }
        if trimmed.chars().count() > NICKNAME_MAX_CHARS {
            return Err(NicknameError::TooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Nickname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Accepted { correct: bool },
    /// Session already expired; the input is dropped.
    Ignored,
}

/// One play-through: the displayed pair, the countdown and the answer log.
///
/// Every mutation goes through `&mut self`, so an input is fully recorded and
/// the next pair drawn before another input or tick can be handled.
#[derive(Debug)]
pub struct Session<R: Rng = StdRng> {
    nickname: Nickname,
    duration: SessionDuration,
    generator: RoundGenerator<R>,
    timer: SessionTimer,
    recorder: AnswerRecorder,
    pair: NumberPair,
}

impl<R: Rng> Session<R> {
    pub fn new(
        nickname: Nickname,
        duration: SessionDuration,
        mut generator: RoundGenerator<R>,
    ) -> Self {
        let pair = generator.next_pair();
        Self {
            nickname,
            duration,
            generator,
            timer: SessionTimer::new(duration),
            recorder: AnswerRecorder::new(),
            pair,
        }
    }

    pub fn dispatch(&mut self, side: Side, now: u64) -> InputOutcome {
        if self.timer.is_expired() {
            return InputOutcome::Ignored;
        }

        if self.timer.start(now) {
            log::debug!("first answer, {}s countdown running", self.duration);
        }

        let record = self.recorder.record(side, self.pair, now);
        self.pair = self.generator.next_pair();
        InputOutcome::Accepted {
            correct: record.correct,
        }
    }

    /// Advances the countdown; `Some` exactly once, when time runs out.
    pub fn on_tick(&mut self, now: u64) -> Option<TimerEvent> {
        self.timer.on_tick(now)
    }

    pub fn pair(&self) -> NumberPair {
        self.pair
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn duration(&self) -> SessionDuration {
        self.duration
    }

    pub fn has_started(&self) -> bool {
        self.timer.has_started()
    }

    pub fn is_expired(&self) -> bool {
        self.timer.is_expired()
    }

    pub fn time_left_secs(&self) -> u64 {
        self.timer.time_left_secs()
    }

    pub fn remaining_ratio(&self) -> f64 {
        self.timer.remaining_ratio()
    }

    pub fn answered(&self) -> usize {
        self.recorder.len()
    }

    pub fn correct_answers(&self) -> usize {
        self.recorder.correct_count()
    }

    pub fn history(&self) -> &[AnswerRecord] {
        self.recorder.history()
    }

    /// Ends the session, handing its history to the caller.
    pub fn into_history(self) -> Vec<AnswerRecord> {
        self.recorder.into_history()
    }
}
