use std::sync::Arc;

use services::{CatalogService, ExamService};

/// What the composition root must hand the UI.
pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<CatalogService>;
    fn exam(&self) -> Arc<ExamService>;
}

/// Shared handle passed into every view.
///
/// Views declare the session manager as an explicit dependency through this
/// context; there is no ambient lookup and no second writable path to the
/// session.
#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<CatalogService>,
    exam: Arc<ExamService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            exam: app.exam(),
        }
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
