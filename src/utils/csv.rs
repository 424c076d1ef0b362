// src/utils/csv.rs

//! Question bank import and export.
//!
//! Import layout: a header row, then `question, choice.., correct answer`.
//! Export layout: a BOM, the [`EXPORT_HEADER`] row, then
//! `id, question, "a | b | c", correct answer`. Files in the export layout
//! are recognised on import, so an export can be uploaded again.

use crate::{
    error::AppError,
    models::question::{CHOICE_DELIMITER, NewQuestion, Question},
};

const BOM: char = '\u{feff}';

pub const EXPORT_HEADER: [&str; 4] = ["question id", "question text", "choices", "correct answer"];

const EXPORT_CHOICE_SEPARATOR: &str = " | ";

/// Splits CSV text into records. Handles quoted fields, doubled quotes and
/// line breaks inside quotes; accepts `\n` and `\r\n` line endings.
///
/// A quote only opens a quoted field at the start of a cell; anywhere else
/// it is kept as a literal character. Input ending inside a quoted field is
/// rejected.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, AppError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::BadRequest(format!(
            "Row {}: quoted cell is never closed",
            records.len() + 1
        )));
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn is_export_header(row: &[String]) -> bool {
    row.len() == EXPORT_HEADER.len()
        && row
            .iter()
            .zip(EXPORT_HEADER)
            .all(|(cell, expected)| cell.trim().eq_ignore_ascii_case(expected))
}

fn check_choices(choices: &[String], line: usize) -> Result<(), AppError> {
    if choices.is_empty() {
        return Err(AppError::BadRequest(format!("Row {}: no choices given", line)));
    }
    if choices.iter().any(|c| c.contains(CHOICE_DELIMITER)) {
        return Err(AppError::BadRequest(format!(
            "Row {}: choices must not contain '{}'",
            line, CHOICE_DELIMITER
        )));
    }
    Ok(())
}

/// Parses an uploaded question bank.
///
/// A leading BOM is stripped and the header row skipped. Rows with fewer
/// than two cells or only blank cells are ignored, as are empty choice
/// cells.
pub fn parse_question_bank(text: &str) -> Result<Vec<NewQuestion>, AppError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();

    let export_layout = match records.next() {
        Some(header) => is_export_header(&header),
        None => return Ok(Vec::new()),
    };

    let mut questions = Vec::new();
    // Row numbers are 1-based and count the header.
    for (i, row) in records.enumerate() {
        let line = i + 2;
        if row.len() < 2 || is_blank(&row) {
            continue;
        }

        let question = if export_layout {
            if row.len() < EXPORT_HEADER.len() {
                return Err(AppError::BadRequest(format!(
                    "Row {}: expected {} columns",
                    line,
                    EXPORT_HEADER.len()
                )));
            }
            let choices: Vec<String> = row[2]
                .split(CHOICE_DELIMITER)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            NewQuestion {
                question_text: row[1].trim().to_string(),
                choices,
                correct_answer: row[3].trim().to_string(),
            }
        } else {
            let last = row.len() - 1;
            let choices: Vec<String> = row[1..last]
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            NewQuestion {
                question_text: row[0].trim().to_string(),
                choices,
                correct_answer: row[last].trim().to_string(),
            }
        };

        check_choices(&question.choices, line)?;
        questions.push(question);
    }

    Ok(questions)
}

/// Renders a question bank in the export layout, BOM first.
pub fn export_question_bank(questions: &[Question]) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_row(&mut out, &EXPORT_HEADER.map(str::to_string));

    for q in questions {
        push_row(
            &mut out,
            &[
                q.id.to_string(),
                q.question_text.clone(),
                q.choices.join(EXPORT_CHOICE_SEPARATOR),
                q.correct_answer.clone(),
            ],
        );
    }

    out
}

fn push_row(out: &mut String, cells: &[String]) {
    let line: Vec<String> = cells.iter().map(|c| csv_quote(c)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}
