// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::attempt::Mode;

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub name: String,

    /// Time limit in minutes. Only applies to exam-mode attempts.
    pub duration: i64,

    /// Number of questions drawn for each attempt.
    pub total_questions: i64,

    /// Minimum fraction of correct answers, in [0, 1].
    pub pass_rate: f64,

    pub exam_date: Option<chrono::NaiveDate>,

    /// Mode used when a student does not pick one.
    pub mode: Mode,
}

/// DTO for creating a new exam.
/// `pass_rate` is given in percent, as entered on the admin form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 100, message = "Exam name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(range(min = 1, message = "Duration must be at least one minute."))]
    pub duration: i64,
    #[validate(range(min = 1, message = "An exam must draw at least one question."))]
    pub total_questions: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "Pass rate must be a percentage."))]
    #[serde(default = "default_pass_rate_percent")]
    pub pass_rate: f64,
    pub exam_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub mode: Mode,
}

fn default_pass_rate_percent() -> f64 {
    60.0
}

impl CreateExamRequest {
    pub fn pass_fraction(&self) -> f64 {
        self.pass_rate / 100.0
    }
}
