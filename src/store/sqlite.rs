// src/store/sqlite.rs

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    error::AppError,
    models::{
        answer::{Answer, NewAnswer},
        exam::{CreateExamRequest, Exam},
        question::{NewQuestion, Question, QuestionRow, join_choices},
    },
    store::{AnswerStore, QuestionStore},
};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens a pool on `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database. Each connection of an in-memory URL gets
    /// its own database, so the pool is pinned to a single connection that
    /// is never recycled.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn create_exam(&self, req: &CreateExamRequest) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO exams (name, duration, total_questions, pass_rate, exam_date, mode)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.name.trim())
        .bind(req.duration)
        .bind(req.total_questions)
        .bind(req.pass_fraction())
        .bind(req.exam_date)
        .bind(req.mode)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Appends a parsed question bank to an exam in one transaction.
    pub async fn add_questions(
        &self,
        exam_id: i64,
        questions: &[NewQuestion],
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for q in questions {
            sqlx::query(
                r#"
                INSERT INTO questions (exam_id, question_text, choices, correct_answer)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(exam_id)
            .bind(&q.question_text)
            .bind(join_choices(&q.choices))
            .bind(&q.correct_answer)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert question: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;
        }

        tx.commit().await?;
        Ok(questions.len())
    }

    /// Removes an exam together with its questions and recorded answers.
    /// Returns `false` if the exam did not exist.
    pub async fn delete_exam(&self, exam_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM answers WHERE exam_id = ?")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM questions WHERE exam_id = ?")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM exams WHERE id = ?")
            .bind(exam_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete exam: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes one student's recorded answers for an exam.
    pub async fn delete_answers(&self, exam_id: i64, student_name: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM answers WHERE exam_id = ? AND student_name = ?")
            .bind(exam_id)
            .bind(student_name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete answers: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn list_exams(&self) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, name, duration, total_questions, pass_rate, exam_date, mode
            FROM exams
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exams: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(exams)
    }

    async fn exam(&self, exam_id: i64) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, name, duration, total_questions, pass_rate, exam_date, mode
            FROM exams
            WHERE id = ?
            "#,
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(exam)
    }

    async fn questions_for_exam(&self, exam_id: i64) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, exam_id, question_text, choices, correct_answer
            FROM questions
            WHERE exam_id = ?
            ORDER BY id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn question(&self, question_id: i64) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, exam_id, question_text, choices, correct_answer
            FROM questions
            WHERE id = ?
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Question::from))
    }
}

#[async_trait]
impl AnswerStore for SqliteStore {
    async fn replace_answers(
        &self,
        exam_id: i64,
        student_name: &str,
        answers: &[NewAnswer],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM answers WHERE exam_id = ? AND student_name = ?")
            .bind(exam_id)
            .bind(student_name)
            .execute(&mut *tx)
            .await?;

        for answer in answers {
            sqlx::query(
                r#"
                INSERT INTO answers (student_name, exam_id, question_id, selected_answer)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(student_name)
            .bind(exam_id)
            .bind(answer.question_id)
            .bind(&answer.selected_answer)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record answer: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn answers_for(&self, exam_id: i64, student_name: &str) -> Result<Vec<Answer>, AppError> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, student_name, exam_id, question_id, selected_answer
            FROM answers
            WHERE exam_id = ? AND student_name = ?
            ORDER BY id
            "#,
        )
        .bind(exam_id)
        .bind(student_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch answers: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(answers)
    }

    async fn answers_for_exam(&self, exam_id: i64) -> Result<Vec<Answer>, AppError> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, student_name, exam_id, question_id, selected_answer
            FROM answers
            WHERE exam_id = ?
            ORDER BY id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}
