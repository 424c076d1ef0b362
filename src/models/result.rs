// src/models/result.rs

use serde::Serialize;

/// Correctness of one recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub question_text: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Score of one stored attempt. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: usize,
    pub max_score: usize,
    pub passed: bool,
    pub results: Vec<QuestionOutcome>,
}

/// Immediate feedback for a single question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub is_correct: bool,

    /// Only revealed when the submitted answer is wrong.
    pub correct_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub student_name: String,
    pub exam_id: i64,
    pub exam_name: String,
    #[serde(flatten)]
    pub result: ScoreResult,
}

/// One row of the admin score overview.
#[derive(Debug, Serialize)]
pub struct ExamHistoryEntry {
    pub exam_id: i64,
    pub exam_name: String,
    pub student_name: String,
    pub score: usize,
    pub max_score: usize,
    pub passed: bool,
    pub exam_date: Option<chrono::NaiveDate>,
}
