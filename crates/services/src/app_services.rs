use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::exam_service::ExamService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CatalogService>,
    exam: Arc<ExamService>,
}

impl AppServices {
    /// Build services over an already-initialized storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the persisted session cannot be
    /// hydrated.
    pub async fn new(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.questions)));
        let exam = Arc::new(ExamService::load(clock, Arc::clone(&storage.session_state)).await?);
        Ok(Self { catalog, exam })
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or session
    /// hydration fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new(&storage, clock).await
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn exam(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam)
    }
}
