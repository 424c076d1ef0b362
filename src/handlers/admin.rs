// src/handlers/admin.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    attempt::scoring,
    error::AppError,
    models::{
        answer::Answer,
        exam::CreateExamRequest,
        question::Question,
        result::ExamHistoryEntry,
    },
    store::{AnswerStore, QuestionStore, SqliteStore},
    utils::csv::{export_question_bank, parse_question_bank},
};

/// Creates a new exam without questions.
/// Admin only.
pub async fn create_exam(
    State(store): State<SqliteStore>,
    Json(payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = store.create_exam(&payload).await?;
    tracing::info!(exam_id = id, "Created exam '{}'", payload.name.trim());

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Deletes an exam with its questions and recorded answers.
/// Admin only.
pub async fn delete_exam(
    State(store): State<SqliteStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_exam(id).await? {
        return Err(AppError::InvalidExam(id));
    }

    tracing::info!(exam_id = id, "Deleted exam");
    Ok(StatusCode::NO_CONTENT)
}

/// Appends an uploaded CSV question bank to an exam.
/// The request body is the CSV text.
/// Admin only.
pub async fn upload_questions(
    State(store): State<SqliteStore>,
    Path(id): Path<i64>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let exam = store.exam(id).await?.ok_or(AppError::InvalidExam(id))?;
    let questions = parse_question_bank(&body)?;
    let imported = store.add_questions(exam.id, &questions).await?;

    tracing::info!(exam_id = exam.id, imported, "Imported question bank");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"exam_id": exam.id, "imported": imported})),
    ))
}

/// Downloads an exam's question bank as CSV (UTF-8 with BOM).
/// Admin only.
pub async fn export_questions(
    State(store): State<SqliteStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store.exam(id).await?.ok_or(AppError::InvalidExam(id))?;
    let questions = store.questions_for_exam(exam.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=exam_{}.csv", exam.id),
            ),
        ],
        export_question_bank(&questions),
    ))
}

/// Deletes one student's recorded answers for an exam.
/// Admin only.
pub async fn delete_answers(
    State(store): State<SqliteStore>,
    Path((exam_id, student_name)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let student_name = student_name.trim();
    if student_name.is_empty() {
        return Err(AppError::BadRequest("Student name is required".to_string()));
    }

    let deleted = store.delete_answers(exam_id, student_name).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "No recorded answers for '{}' in exam {}",
            student_name, exam_id
        )));
    }

    tracing::info!(exam_id, student = %student_name, deleted, "Deleted recorded answers");
    Ok(StatusCode::NO_CONTENT)
}

/// Scores every recorded attempt of every exam.
/// Admin only.
pub async fn list_results(State(store): State<SqliteStore>) -> Result<impl IntoResponse, AppError> {
    let mut history = Vec::new();

    for exam in store.list_exams().await? {
        let answers = store.answers_for_exam(exam.id).await?;
        if answers.is_empty() {
            continue;
        }

        let questions: HashMap<i64, Question> = store
            .questions_for_exam(exam.id)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect();

        for (student_name, student_answers) in group_by_student(answers) {
            let result = scoring::evaluate(&exam, &student_answers, &questions)?;
            history.push(ExamHistoryEntry {
                exam_id: exam.id,
                exam_name: exam.name.clone(),
                student_name,
                score: result.score,
                max_score: result.max_score,
                passed: result.passed,
                exam_date: exam.exam_date,
            });
        }
    }

    Ok(Json(history))
}

/// Groups answers per student, students in order of their first answer.
fn group_by_student(answers: Vec<Answer>) -> Vec<(String, Vec<Answer>)> {
    let mut groups: Vec<(String, Vec<Answer>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for answer in answers {
        match index.get(&answer.student_name) {
            Some(&i) => groups[i].1.push(answer),
            None => {
                index.insert(answer.student_name.clone(), groups.len());
                groups.push((answer.student_name.clone(), vec![answer]));
            }
        }
    }

    groups
}
