// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Delimiter joining the choices of a question in storage.
pub const CHOICE_DELIMITER: char = '|';

/// Raw row of the 'questions' table. Choices are still joined.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub exam_id: i64,
    pub question_text: String,
    pub choices: String,
    pub correct_answer: String,
}

/// A question with its choices split out, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub exam_id: i64,
    pub question_text: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            exam_id: row.exam_id,
            question_text: row.question_text,
            choices: split_choices(&row.choices),
            correct_answer: row.correct_answer,
        }
    }
}

/// DTO for sending question to client (excludes the correct answer).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub choices: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text.clone(),
            choices: q.choices.clone(),
        }
    }
}

/// A parsed question bank entry, not yet attached to an exam.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_text: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
}

pub fn join_choices(choices: &[String]) -> String {
    let mut joined = String::new();
    for (i, choice) in choices.iter().enumerate() {
        if i > 0 {
            joined.push(CHOICE_DELIMITER);
        }
        joined.push_str(choice);
    }
    joined
}

pub fn split_choices(joined: &str) -> Vec<String> {
    joined
        .split(CHOICE_DELIMITER)
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
        .collect()
}
