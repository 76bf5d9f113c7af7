//! Offline catalog import: CSV rows in, keyed question documents out.
//!
//! The job is single-writer and run-to-completion. Writes are grouped into
//! batches of at most [`MAX_BATCH_WRITES`] records; each full batch is
//! committed before the next one starts, and a final partial batch is
//! committed at the end. A failed commit aborts the rest of the run and
//! leaves earlier batches in place, so operators treat the import as
//! at-least-once: the `{tema}-{number}` key makes re-runs overwrite rather
//! than duplicate.

use std::io::Read;

use exam_core::Clock;
use exam_core::model::{QuestionDraft, QuestionId, TopicId};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::repository::{QuestionRecord, QuestionRepository, StorageError};

/// Batch-size limit of the keyed document store.
pub const MAX_BATCH_WRITES: usize = 500;

/// What to do with a row that fails parsing or validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// Count and log the row, keep going.
    #[default]
    Skip,
    /// Fail the run on the first bad row.
    Abort,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Totals reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_read: usize,
    pub imported: usize,
    pub skipped: usize,
    pub batches: usize,
}

/// One CSV record. Extra columns in the input are ignored.
#[derive(Debug, Deserialize)]
struct ImportRow {
    tema: u32,
    number: u32,
    text: String,
    a: String,
    b: String,
    c: String,
    d: String,
    answer: String,
}

impl ImportRow {
    /// Normalize the row through draft validation, then attach the audit
    /// metadata every written document carries.
    fn into_record(
        self,
        random_key: f64,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<QuestionRecord, exam_core::model::QuestionError> {
        let tema = self.tema;
        let number = self.number;
        let question = QuestionDraft {
            id: QuestionId::from_parts(TopicId::new(tema), number).to_string(),
            topic: TopicId::new(tema),
            text: self.text,
            options: [self.a, self.b, self.c, self.d],
            answer: self.answer,
        }
        .validate()?;

        Ok(QuestionRecord {
            tema,
            number,
            text: question.text().to_owned(),
            options: question.options().clone(),
            answer: question.correct(),
            random_key,
            created_at,
        })
    }
}

/// Streams a CSV catalog into a question repository in bounded batches.
pub struct Importer {
    clock: Clock,
    policy: RowPolicy,
}

impl Importer {
    #[must_use]
    pub fn new(clock: Clock, policy: RowPolicy) -> Self {
        Self { clock, policy }
    }

    /// Run the import against `repo`.
    ///
    /// The input must carry a header row with the columns
    /// `tema, number, text, a, b, c, d, answer`.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidRow` for a bad row under
    /// `RowPolicy::Abort`, or `ImportError::Storage` if a batch commit fails.
    pub async fn run<R: Read>(
        &self,
        input: R,
        repo: &dyn QuestionRepository,
    ) -> Result<ImportReport, ImportError> {
        let now = self.clock.now();
        let mut reader = csv::Reader::from_reader(input);
        let mut report = ImportReport::default();
        let mut batch: Vec<QuestionRecord> = Vec::with_capacity(MAX_BATCH_WRITES);

        for (index, result) in reader.deserialize::<ImportRow>().enumerate() {
            let row = index + 1;
            report.rows_read += 1;

            let record = result
                .map_err(|e| e.to_string())
                .and_then(|r| {
                    r.into_record(rand::rng().random(), now)
                        .map_err(|e| e.to_string())
                });

            match record {
                Ok(record) => batch.push(record),
                Err(reason) => match self.policy {
                    RowPolicy::Skip => {
                        warn!(row, %reason, "skipping invalid row");
                        report.skipped += 1;
                    }
                    RowPolicy::Abort => {
                        return Err(ImportError::InvalidRow { row, reason });
                    }
                },
            }

            if batch.len() == MAX_BATCH_WRITES {
                flush(repo, &mut batch, &mut report).await?;
            }
        }

        if !batch.is_empty() {
            flush(repo, &mut batch, &mut report).await?;
        }

        info!(
            rows = report.rows_read,
            imported = report.imported,
            skipped = report.skipped,
            batches = report.batches,
            "import finished"
        );
        Ok(report)
    }
}

async fn flush(
    repo: &dyn QuestionRepository,
    batch: &mut Vec<QuestionRecord>,
    report: &mut ImportReport,
) -> Result<(), ImportError> {
    repo.upsert_batch(batch).await?;
    report.batches += 1;
    report.imported += batch.len();
    info!(batch = report.batches, writes = batch.len(), "committed batch");
    batch.clear();
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
