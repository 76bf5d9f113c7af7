use exam_core::model::{Question, TopicId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_question_row, ser};
use crate::repository::{QuestionRecord, QuestionRepository, StorageError};

fn question_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    map_question_row(row)?.into_question().map_err(ser)
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_batch(&self, records: &[QuestionRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }

        // One transaction per batch: the whole batch commits or none of it.
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for record in records {
            sqlx::query(
                r"
                    INSERT INTO questions (
                        key, tema, number, text, a, b, c, d, answer,
                        random_key, created_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    ON CONFLICT(key) DO UPDATE SET
                        tema = excluded.tema,
                        number = excluded.number,
                        text = excluded.text,
                        a = excluded.a,
                        b = excluded.b,
                        c = excluded.c,
                        d = excluded.d,
                        answer = excluded.answer,
                        random_key = excluded.random_key,
                        created_at = excluded.created_at
                ",
            )
            .bind(record.key())
            .bind(i64::from(record.tema))
            .bind(i64::from(record.number))
            .bind(&record.text)
            .bind(&record.options[0])
            .bind(&record.options[1])
            .bind(&record.options[2])
            .bind(&record.options[3])
            .bind(record.answer.label())
            .bind(record.random_key)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT tema, number, text, a, b, c, d, answer, random_key, created_at
                FROM questions
                ORDER BY tema ASC, number ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(question_from_row(&row)?);
        }
        Ok(out)
    }

    async fn questions_for_topic(&self, topic: TopicId) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT tema, number, text, a, b, c, d, answer, random_key, created_at
                FROM questions
                WHERE tema = ?1
                ORDER BY number ASC
            ",
        )
        .bind(i64::from(topic.value()))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(question_from_row(&row)?);
        }
        Ok(out)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM questions")
            .fetch_one(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }
}
