// src/attempt/mod.rs

//! Lifecycle of a single exam attempt: start, question draw, timer,
//! submission and scoring.

pub mod recorder;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod timer;

use rand::Rng;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptKey, AttemptSession, Mode},
        exam::Exam,
        question::Question,
    },
    store::QuestionStore,
};

use self::session::SessionStore;

/// Looks up an exam, failing with `InvalidExam` if it does not exist.
pub async fn resolve_exam(questions: &dyn QuestionStore, exam_id: i64) -> Result<Exam, AppError> {
    questions
        .exam(exam_id)
        .await?
        .ok_or(AppError::InvalidExam(exam_id))
}

/// Starts (or resumes) an attempt. `mode` falls back to the exam's default.
pub async fn start(
    questions: &dyn QuestionStore,
    sessions: &dyn SessionStore,
    exam_id: i64,
    student_name: &str,
    mode: Option<Mode>,
    now: i64,
) -> Result<(Exam, AttemptSession), AppError> {
    let exam = resolve_exam(questions, exam_id).await?;
    let key = AttemptKey::new(exam.id, student_name);
    let session = sessions.start(&key, mode.unwrap_or(exam.mode), now)?;

    tracing::info!(
        exam_id = exam.id,
        student = %student_name,
        mode = %session.mode,
        started_at = session.started_at,
        "Attempt started"
    );

    Ok((exam, session))
}

/// Draws a fresh question set for the attempt and remembers it.
///
/// An attempt that was never started is started in the exam's default mode.
/// Each call redraws. An exam without questions yields an empty set.
pub async fn draw_questions<R: Rng + ?Sized>(
    questions: &dyn QuestionStore,
    sessions: &dyn SessionStore,
    exam: &Exam,
    student_name: &str,
    now: i64,
    rng: &mut R,
) -> Result<(Vec<Question>, Mode), AppError> {
    let key = AttemptKey::new(exam.id, student_name);
    let session = sessions.start(&key, exam.mode, now)?;

    let bank = questions.questions_for_exam(exam.id).await?;
    let selected = match selector::select(exam, &bank, rng) {
        Ok(selected) => selected,
        Err(AppError::NoQuestionsAvailable(_)) => {
            tracing::warn!(exam_id = exam.id, "Exam has no questions to draw from");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    sessions.set_question_ids(&key, selected.iter().map(|q| q.id).collect())?;
    tracing::debug!(
        exam_id = exam.id,
        student = %student_name,
        drawn = selected.len(),
        "Question set drawn"
    );

    Ok((selected, session.mode))
}
