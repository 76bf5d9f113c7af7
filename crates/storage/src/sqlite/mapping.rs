use exam_core::model::Choice;
use sqlx::Row;

use crate::repository::{QuestionRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_question_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<QuestionRecord, StorageError> {
    let tema = u32_from_i64("tema", row.try_get::<i64, _>("tema").map_err(ser)?)?;
    let number = u32_from_i64("number", row.try_get::<i64, _>("number").map_err(ser)?)?;
    let text: String = row.try_get("text").map_err(ser)?;
    let a: String = row.try_get("a").map_err(ser)?;
    let b: String = row.try_get("b").map_err(ser)?;
    let c: String = row.try_get("c").map_err(ser)?;
    let d: String = row.try_get("d").map_err(ser)?;
    let answer: String = row.try_get("answer").map_err(ser)?;
    let answer = answer.parse::<Choice>().map_err(ser)?;
    let random_key: f64 = row.try_get("random_key").map_err(ser)?;
    let created_at = row.try_get("created_at").map_err(ser)?;

    Ok(QuestionRecord {
        tema,
        number,
        text,
        options: [a, b, c, d],
        answer,
        random_key,
        created_at,
    })
}
