// src/models/answer.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored in place of a choice for questions the student never answered.
pub const UNANSWERED: &str = "unanswered";

/// Represents the 'answers' table in the database.
/// One row per (student, exam, question) of the last exam-mode submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub student_name: String,
    pub exam_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
}

/// An answer about to be written; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub question_id: i64,
    pub selected_answer: String,
}

/// DTO for submitting an attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub student_name: String,
    pub exam_id: i64,

    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: User's selected option (String)
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}

/// DTO for the live per-question check.
#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub exam_id: i64,
    pub question_id: i64,
    #[serde(default)]
    pub selected_answer: String,
}
