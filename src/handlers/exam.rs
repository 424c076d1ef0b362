// src/handlers/exam.rs

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

use crate::{
    attempt::{self, recorder, scoring, session::SessionStore, timer},
    config::Config,
    error::AppError,
    models::{
        answer::{CheckAnswerRequest, SubmitRequest},
        attempt::{AttemptQuery, StartRequest, StartResponse},
        question::{PublicQuestion, Question},
        result::ResultResponse,
    },
    store::{AnswerStore, QuestionStore, SqliteStore},
};

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn student_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Student name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Lists every exam a student can pick from.
pub async fn list_exams(State(store): State<SqliteStore>) -> Result<impl IntoResponse, AppError> {
    let exams = store.list_exams().await?;
    Ok(Json(exams))
}

/// Starts or resumes an attempt.
///
/// Calling it again for the same student and exam keeps the original start
/// time, so the clock keeps running across page reloads.
pub async fn start_exam(
    State(store): State<SqliteStore>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Json(req): Json<StartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_name = student_name(&req.student_name)?;
    let now = now();

    let (exam, session) = attempt::start(
        &store,
        sessions.as_ref(),
        req.exam_id,
        &student_name,
        req.mode,
        now,
    )
    .await?;

    Ok(Json(StartResponse {
        exam_id: exam.id,
        student_name,
        mode: session.mode,
        started_at: session.started_at,
        remaining_seconds: timer::remaining(&exam, session.mode, session.started_at, now),
    }))
}

/// Draws the question set for an attempt. Every call redraws.
/// Correct answers are not sent to the client.
pub async fn load_questions(
    State(store): State<SqliteStore>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Query(query): Query<AttemptQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_name = student_name(&query.student_name)?;
    let exam = attempt::resolve_exam(&store, query.exam_id).await?;

    let mut rng = StdRng::from_entropy();
    let (selected, mode) = attempt::draw_questions(
        &store,
        sessions.as_ref(),
        &exam,
        &student_name,
        now(),
        &mut rng,
    )
    .await?;

    let questions: Vec<PublicQuestion> = selected.iter().map(PublicQuestion::from).collect();

    Ok(Json(json!({
        "questions": questions,
        "effective_total": questions.len(),
        "mode": mode,
    })))
}

/// Checks one answer for immediate feedback. Nothing is stored.
pub async fn check_answer(
    State(store): State<SqliteStore>,
    Json(req): Json<CheckAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = attempt::resolve_exam(&store, req.exam_id).await?;
    let question = store
        .question(req.question_id)
        .await?
        .ok_or(AppError::Mismatch {
            exam_id: exam.id,
            question_id: req.question_id,
        })?;

    let outcome = scoring::check_answer(&exam, &question, &req.selected_answer)?;
    Ok(Json(outcome))
}

/// Submits an attempt.
///
/// Exam-mode answers replace the student's previous answers for this exam.
/// Study-mode submissions are not recorded. The attempt ends either way.
pub async fn submit_exam(
    State(store): State<SqliteStore>,
    State(sessions): State<Arc<dyn SessionStore>>,
    State(config): State<Config>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_name = student_name(&req.student_name)?;
    let exam = attempt::resolve_exam(&store, req.exam_id).await?;

    let outcome = recorder::submit(
        &store,
        sessions.as_ref(),
        &exam,
        &student_name,
        &req.answers,
        now(),
        config.enforce_deadline,
    )
    .await?;

    Ok(Json(json!({
        "status": "ok",
        "mode": outcome.mode,
        "recorded": outcome.recorded,
    })))
}

/// Scores the student's last recorded exam-mode attempt.
pub async fn get_result(
    State(store): State<SqliteStore>,
    Query(query): Query<AttemptQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_name = student_name(&query.student_name)?;
    let exam = attempt::resolve_exam(&store, query.exam_id).await?;

    let answers = store.answers_for(exam.id, &student_name).await?;
    if answers.is_empty() {
        return Err(AppError::NoResultFound);
    }

    let questions: HashMap<i64, Question> = store
        .questions_for_exam(exam.id)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let result = scoring::evaluate(&exam, &answers, &questions)?;

    Ok(Json(ResultResponse {
        student_name,
        exam_id: exam.id,
        exam_name: exam.name,
        result,
    }))
}
