use crate::round::{NumberPair, Side};

/// One accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Milliseconds since the first accepted answer of the session.
    pub time_offset_ms: u64,
    /// Milliseconds since the previous accepted answer; 0 for the first one.
    pub response_time_ms: u64,
    pub correct: bool,
    pub pair: NumberPair,
    pub choice: Side,
}

/// Append-only log of accepted answers with response-time bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AnswerRecorder {
    first_answer_at: Option<u64>,
    question_started_at: Option<u64>,
    history: Vec<AnswerRecord>,
}

impl AnswerRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, choice: Side, pair: NumberPair, now: u64) -> AnswerRecord {
        // timestamps must not run backwards within a session
        let now = self.question_started_at.map_or(now, |prev| now.max(prev));

        let record = match (self.first_answer_at, self.question_started_at) {
            (Some(first), Some(question_start)) => AnswerRecord {
                time_offset_ms: now - first,
                response_time_ms: now - question_start,
                correct: pair.is_correct(choice),
                pair,
                choice,
            },
            _ => {
                self.first_answer_at = Some(now);
                AnswerRecord {
                    time_offset_ms: 0,
                    response_time_ms: 0,
                    correct: pair.is_correct(choice),
                    pair,
                    choice,
                }
            }
        };

        self.question_started_at = Some(now);
        self.history.push(record);
        record
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|r| r.correct).count()
    }

    pub fn into_history(self) -> Vec<AnswerRecord> {
        self.history
    }
}
