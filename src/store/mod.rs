// src/store/mod.rs

//! Durable storage of exams, question banks and recorded answers.
//!
//! The attempt lifecycle only sees the two traits below; the admin surface
//! works on [`SqliteStore`] directly.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        answer::{Answer, NewAnswer},
        exam::Exam,
        question::Question,
    },
};

mod sqlite;

pub use sqlite::SqliteStore;

/// Read-only view of exams and their questions.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn list_exams(&self) -> Result<Vec<Exam>, AppError>;

    async fn exam(&self, exam_id: i64) -> Result<Option<Exam>, AppError>;

    /// All questions of an exam, in insertion order.
    async fn questions_for_exam(&self, exam_id: i64) -> Result<Vec<Question>, AppError>;

    async fn question(&self, question_id: i64) -> Result<Option<Question>, AppError>;
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Replaces every stored answer of `student_name` for `exam_id` with
    /// `answers`, atomically.
    async fn replace_answers(
        &self,
        exam_id: i64,
        student_name: &str,
        answers: &[NewAnswer],
    ) -> Result<(), AppError>;

    /// Stored answers of one student, in the order they were written.
    async fn answers_for(&self, exam_id: i64, student_name: &str) -> Result<Vec<Answer>, AppError>;

    /// Stored answers of every student for an exam.
    async fn answers_for_exam(&self, exam_id: i64) -> Result<Vec<Answer>, AppError>;
}
