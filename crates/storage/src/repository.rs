use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{Choice, Question, QuestionDraft, QuestionError, QuestionId, TopicId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a question document.
///
/// Mirrors the keyed store schema: the document key is `"{tema}-{number}"`,
/// and `random_key`/`created_at` are audit metadata carried by every write
/// but never part of the question's identity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub tema: u32,
    pub number: u32,
    pub text: String,
    pub options: [String; 4],
    pub answer: Choice,
    pub random_key: f64,
    pub created_at: DateTime<Utc>,
}

impl QuestionRecord {
    /// Document key: same `{tema, number}` pair always maps to the same key,
    /// which is what makes re-imports overwrite instead of duplicate.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.tema, self.number)
    }

    /// Convert the record back into a domain `Question`, dropping the audit
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the persisted text fields fail validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        QuestionDraft {
            id: QuestionId::from_parts(TopicId::new(self.tema), self.number).to_string(),
            topic: TopicId::new(self.tema),
            text: self.text,
            options: self.options,
            answer: self.answer.label().to_owned(),
        }
        .validate()
    }
}

/// Repository contract for the question catalog.
///
/// Catalog order is `(tema, number)` ascending; both backends list in that
/// order so "catalog order" means the same thing everywhere.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Commit one batch of records. The whole batch lands or none of it does;
    /// records whose key already exists are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be committed.
    async fn upsert_batch(&self, records: &[QuestionRecord]) -> Result<(), StorageError>;

    /// All questions in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Questions for one topic, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn questions_for_topic(&self, topic: TopicId) -> Result<Vec<Question>, StorageError>;

    /// Number of stored documents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn count(&self) -> Result<u64, StorageError>;
}

/// Device-local key/value store for the durable exam session blob.
///
/// An absent key means "no session"; `clear` must leave nothing behind.
#[async_trait]
pub trait SessionStateRepository: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Durably write `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write does not complete.
    async fn save(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key` entirely. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal does not complete.
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<(u32, u32), QuestionRecord>>>,
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_batch(&self, records: &[QuestionRecord]) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for record in records {
            guard.insert((record.tema, record.number), record.clone());
        }
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let records: Vec<QuestionRecord> = {
            let guard = self
                .questions
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.values().cloned().collect()
        };

        records
            .into_iter()
            .map(|r| {
                r.into_question()
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn questions_for_topic(&self, topic: TopicId) -> Result<Vec<Question>, StorageError> {
        let all = self.list_questions().await?;
        Ok(all.into_iter().filter(|q| q.topic() == topic).collect())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl SessionStateRepository for InMemoryRepository {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the catalog and session-state stores behind trait objects so
/// backends can be swapped wholesale.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub session_state: Arc<dyn SessionStateRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let session_state: Arc<dyn SessionStateRepository> = Arc::new(repo);
        Self {
            questions,
            session_state,
        }
    }
}
