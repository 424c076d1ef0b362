// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // Unknown exam id
    InvalidExam(i64),

    // Submission without a live attempt (expired or never started)
    NoActiveAttempt,

    // Exam has zero questions
    NoQuestionsAvailable(i64),

    // Result requested before any submission
    NoResultFound,

    // Question does not belong to the given exam
    Mismatch { exam_id: i64, question_id: i64 },

    // Exam-mode submission past the deadline (only when enforcement is on)
    DeadlineExpired,

    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidExam(id) => write!(f, "Exam {} does not exist", id),
            AppError::NoActiveAttempt => write!(f, "No active attempt for this exam"),
            AppError::NoQuestionsAvailable(id) => write!(f, "Exam {} has no questions", id),
            AppError::NoResultFound => write!(f, "No result found"),
            AppError::Mismatch {
                exam_id,
                question_id,
            } => write!(
                f,
                "Question {} does not belong to exam {}",
                question_id, exam_id
            ),
            AppError::DeadlineExpired => write!(f, "The time limit for this exam has expired"),
            AppError::InternalServerError(msg)
            | AppError::BadRequest(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidExam(_)
            | AppError::NoQuestionsAvailable(_)
            | AppError::NoResultFound
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoActiveAttempt => StatusCode::CONFLICT,
            AppError::Mismatch { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DeadlineExpired => StatusCode::FORBIDDEN,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "status": "error",
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
