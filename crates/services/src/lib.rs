#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod exam_service;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use error::{AppServicesError, CatalogServiceError, ExamServiceError};
pub use exam_service::{AnswerOutcome, ExamService, SESSION_STATE_KEY};
