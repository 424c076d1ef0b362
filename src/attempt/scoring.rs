// src/attempt/scoring.rs

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::{
        answer::{Answer, UNANSWERED},
        exam::Exam,
        question::Question,
        result::{CheckOutcome, QuestionOutcome, ScoreResult},
    },
};

// Absorbs float error in `max * pass_rate` (0.7 * 10 is 7.000000000000001).
const PASS_EPSILON: f64 = 1e-9;

/// Case-insensitive match of trimmed answers. The sentinel never matches.
pub fn is_correct(selected: &str, correct_answer: &str) -> bool {
    selected != UNANSWERED
        && selected.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}

/// `score >= total * pass_rate`; the boundary passes.
pub fn is_pass(score: usize, total: usize, pass_rate: f64) -> bool {
    score as f64 + PASS_EPSILON >= total as f64 * pass_rate
}

/// Scores a stored attempt.
///
/// `questions` maps question id to question; answers whose question has
/// since disappeared count as wrong. The breakdown follows the order of
/// `answers`.
pub fn evaluate(
    exam: &Exam,
    answers: &[Answer],
    questions: &HashMap<i64, Question>,
) -> Result<ScoreResult, AppError> {
    if answers.is_empty() {
        return Err(AppError::NoResultFound);
    }

    let results: Vec<QuestionOutcome> = answers
        .iter()
        .map(|answer| match questions.get(&answer.question_id) {
            Some(q) => QuestionOutcome {
                question_id: q.id,
                question_text: q.question_text.clone(),
                selected_answer: answer.selected_answer.clone(),
                correct_answer: q.correct_answer.clone(),
                is_correct: is_correct(&answer.selected_answer, &q.correct_answer),
            },
            None => {
                tracing::warn!(
                    exam_id = exam.id,
                    question_id = answer.question_id,
                    "Recorded answer refers to a missing question"
                );
                QuestionOutcome {
                    question_id: answer.question_id,
                    question_text: String::new(),
                    selected_answer: answer.selected_answer.clone(),
                    correct_answer: String::new(),
                    is_correct: false,
                }
            }
        })
        .collect();

    let score = results.iter().filter(|r| r.is_correct).count();
    let max_score = results.len();

    Ok(ScoreResult {
        score,
        max_score,
        passed: is_pass(score, max_score, exam.pass_rate),
        results,
    })
}

/// Immediate feedback on one question. Touches neither sessions nor stored
/// answers.
pub fn check_answer(exam: &Exam, question: &Question, selected: &str) -> Result<CheckOutcome, AppError> {
    if question.exam_id != exam.id {
        return Err(AppError::Mismatch {
            exam_id: exam.id,
            question_id: question.id,
        });
    }

    let is_correct = is_correct(selected, &question.correct_answer);

    Ok(CheckOutcome {
        is_correct,
        correct_answer: if is_correct {
            None
        } else {
            Some(question.correct_answer.trim().to_string())
        },
    })
}
