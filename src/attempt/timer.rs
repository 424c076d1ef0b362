// src/attempt/timer.rs

use crate::models::{attempt::Mode, exam::Exam};

/// Seconds left in an attempt, floored at zero.
/// Study attempts have no deadline and yield `None`.
pub fn remaining(exam: &Exam, mode: Mode, started_at: i64, now: i64) -> Option<i64> {
    match mode {
        Mode::Study => None,
        Mode::Exam => {
            let limit = exam.duration.saturating_mul(60);
            let elapsed = now.saturating_sub(started_at);
            Some(limit.saturating_sub(elapsed).max(0))
        }
    }
}

/// Whether a timed attempt has run out of time.
pub fn is_expired(exam: &Exam, mode: Mode, started_at: i64, now: i64) -> bool {
    remaining(exam, mode, started_at, now) == Some(0)
}
