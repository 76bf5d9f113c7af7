mod catalog;
mod ids;
mod question;
mod session;

pub use catalog::Catalog;
pub use ids::{ParseIdError, QuestionId, TopicId};
pub use question::{Choice, Question, QuestionDraft, QuestionError};
pub use session::{ExamScore, ExamSession, SessionError};
