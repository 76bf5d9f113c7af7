use std::sync::Arc;

use exam_core::model::{Catalog, Question, TopicId};
use storage::repository::QuestionRepository;

use crate::error::CatalogServiceError;

/// Read-only view over the question repository for the topic picker.
pub struct CatalogService {
    questions: Arc<dyn QuestionRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// The full catalog in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the repository cannot be read.
    pub async fn catalog(&self) -> Result<Catalog, CatalogServiceError> {
        Ok(Catalog::new(self.questions.list_questions().await?))
    }

    /// Distinct topic ids in first-seen catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the repository cannot be read.
    pub async fn topics(&self) -> Result<Vec<TopicId>, CatalogServiceError> {
        Ok(self.catalog().await?.topics())
    }

    /// Exactly the questions tagged with `topic`, in catalog order: the
    /// sequence a new exam is started with.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the repository cannot be read.
    pub async fn questions_for_topic(
        &self,
        topic: TopicId,
    ) -> Result<Vec<Question>, CatalogServiceError> {
        Ok(self.questions.questions_for_topic(topic).await?)
    }
}
