// src/models/attempt.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an attempt is run.
/// `Exam` is timed, scored and recorded; `Study` is none of those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Exam,
    Study,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Exam => "exam",
            Mode::Study => "study",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one student's attempt at one exam.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttemptKey {
    pub exam_id: i64,
    pub student_name: String,
}

impl AttemptKey {
    pub fn new(exam_id: i64, student_name: impl Into<String>) -> Self {
        Self {
            exam_id,
            student_name: student_name.into(),
        }
    }
}

/// Ephemeral state of an attempt in progress. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSession {
    pub mode: Mode,

    /// UTC epoch seconds of the first start call.
    pub started_at: i64,

    /// Question ids drawn for this attempt, in display order.
    /// `None` until the questions have been loaded.
    pub question_ids: Option<Vec<i64>>,
}

/// DTO for starting an attempt.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub student_name: String,
    pub exam_id: i64,
    pub mode: Option<Mode>,
}

/// Reply to a start call.
///
/// `(exam_id, student_name, started_at)` identifies one attempt: repeated
/// starts of the same attempt echo the same `started_at`, and a new attempt
/// after submission gets a new one.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub exam_id: i64,
    pub student_name: String,
    pub mode: Mode,

    /// Correlation token of the attempt (UTC epoch seconds of its start).
    pub started_at: i64,

    /// Seconds left on the clock; `null` in study mode.
    pub remaining_seconds: Option<i64>,
}

/// Query string shared by question load and result retrieval.
#[derive(Debug, Deserialize)]
pub struct AttemptQuery {
    pub exam_id: i64,
    #[serde(default)]
    pub student_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Study).unwrap(), "\"study\"");
        let mode: Mode = serde_json::from_str("\"exam\"").unwrap();
        assert_eq!(mode, Mode::Exam);
    }
}
