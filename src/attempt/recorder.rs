// src/attempt/recorder.rs

use std::collections::HashMap;

use crate::{
    attempt::{session::SessionStore, timer},
    error::AppError,
    models::{
        answer::{NewAnswer, UNANSWERED},
        attempt::{AttemptKey, Mode},
        exam::Exam,
    },
    store::AnswerStore,
};

/// What a submission did.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub mode: Mode,

    /// Number of answer rows written; zero for study attempts.
    pub recorded: usize,
}

/// Builds one answer per drawn question, in draw order. Questions the
/// student never answered get the sentinel.
pub fn answers_for_selection(question_ids: &[i64], submitted: &HashMap<i64, String>) -> Vec<NewAnswer> {
    question_ids
        .iter()
        .map(|id| NewAnswer {
            question_id: *id,
            selected_answer: submitted
                .get(id)
                .cloned()
                .unwrap_or_else(|| UNANSWERED.to_string()),
        })
        .collect()
}

/// Ends an attempt.
///
/// Exam attempts replace the student's stored answers for this exam; study
/// attempts write nothing. The session is cleared in every case once the
/// attempt is found, including when the write fails.
///
/// With `enforce_deadline`, an exam attempt whose timer has run out is
/// rejected with `DeadlineExpired`.
pub async fn submit(
    store: &dyn AnswerStore,
    sessions: &dyn SessionStore,
    exam: &Exam,
    student_name: &str,
    submitted: &HashMap<i64, String>,
    now: i64,
    enforce_deadline: bool,
) -> Result<SubmitOutcome, AppError> {
    let key = AttemptKey::new(exam.id, student_name);

    let session = sessions.get(&key)?.ok_or(AppError::NoActiveAttempt)?;
    let question_ids = match session.question_ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => return Err(AppError::NoActiveAttempt),
    };

    if enforce_deadline && timer::is_expired(exam, session.mode, session.started_at, now) {
        sessions.clear(&key)?;
        tracing::info!(
            exam_id = exam.id,
            student = %student_name,
            "Rejected submission past the deadline"
        );
        return Err(AppError::DeadlineExpired);
    }

    let written = match session.mode {
        Mode::Study => Ok(0),
        Mode::Exam => {
            let answers = answers_for_selection(&question_ids, submitted);
            store
                .replace_answers(exam.id, student_name, &answers)
                .await
                .map(|_| answers.len())
        }
    };

    let cleared = sessions.clear(&key);
    let recorded = written?;
    cleared?;

    tracing::info!(
        exam_id = exam.id,
        student = %student_name,
        mode = %session.mode,
        recorded,
        "Attempt submitted"
    );

    Ok(SubmitOutcome {
        mode: session.mode,
        recorded,
    })
}
