// src/attempt/selector.rs

use rand::{Rng, seq::SliceRandom};

use crate::{
    error::AppError,
    models::{exam::Exam, question::Question},
};

/// Draws `min(exam.total_questions, questions.len())` questions at random,
/// without replacement, in random order.
///
/// The random source is supplied by the caller so the draw can be made
/// deterministic.
pub fn select<R: Rng + ?Sized>(
    exam: &Exam,
    questions: &[Question],
    rng: &mut R,
) -> Result<Vec<Question>, AppError> {
    if questions.is_empty() {
        return Err(AppError::NoQuestionsAvailable(exam.id));
    }

    let target = usize::try_from(exam.total_questions).unwrap_or(0);
    let amount = target.min(questions.len());

    Ok(questions.choose_multiple(rng, amount).cloned().collect())
}
