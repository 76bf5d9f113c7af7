use std::sync::{Arc, Mutex, MutexGuard};

use exam_core::Clock;
use exam_core::model::{Choice, ExamSession, Question, QuestionId};
use storage::repository::SessionStateRepository;
use tracing::debug;

use crate::error::ExamServiceError;

/// Key of the single durable session blob.
pub const SESSION_STATE_KEY: &str = "exam-session";

/// What an `answer` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was recorded; the snapshot reflects it.
    Recorded(ExamSession),
    /// There was no session to record into; nothing changed.
    NoSession,
}

/// Single source of truth for the current exam attempt.
///
/// Holds at most one live session, mirrors every transition into the
/// device-local blob store before the call returns, and hands out snapshots
/// so no caller ever holds a competing writable reference. The state machine
/// is deliberately small: no session, or a session in progress. Completion
/// is derived from the answers, never stored, and `start_exam` always
/// replaces whatever was in progress.
pub struct ExamService {
    clock: Clock,
    store: Arc<dyn SessionStateRepository>,
    current: Mutex<Option<ExamSession>>,
}

impl ExamService {
    /// Hydrate the service from the durable blob.
    ///
    /// An absent key means no session. An unreadable blob or a failing store
    /// is surfaced: the session is recreatable data, so callers may treat
    /// this as a startup fault.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError` if the blob cannot be read or decoded.
    pub async fn load(
        clock: Clock,
        store: Arc<dyn SessionStateRepository>,
    ) -> Result<Self, ExamServiceError> {
        let current = match store.load(SESSION_STATE_KEY).await? {
            Some(bytes) => {
                let session: ExamSession = serde_json::from_slice(&bytes)?;
                debug!(
                    questions = session.total(),
                    answered = session.answered_count(),
                    "resumed persisted session"
                );
                Some(session)
            }
            None => None,
        };

        Ok(Self {
            clock,
            store,
            current: Mutex::new(current),
        })
    }

    /// Start a new exam over `questions`, replacing any session in progress.
    ///
    /// Question order is kept verbatim; every question starts unanswered;
    /// `started_at` comes from the service clock.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Session` for an empty or duplicate-id
    /// sequence, or `ExamServiceError::Storage` if persisting fails (the
    /// prior session is kept in that case).
    pub async fn start_exam(
        &self,
        questions: Vec<Question>,
    ) -> Result<ExamSession, ExamServiceError> {
        let session = ExamSession::new(questions, self.clock.now())?;
        self.persist(&session).await?;

        let mut guard = self.lock()?;
        *guard = Some(session.clone());
        debug!(questions = session.total(), "exam started");
        Ok(session)
    }

    /// Record one answer by question id, overwriting any prior pick.
    ///
    /// With no live session this is a no-op; an answer call must never raise
    /// a session into existence.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Session` if the id is not part of the
    /// session, or `ExamServiceError::Storage` if persisting fails.
    pub async fn record_answer(
        &self,
        id: &QuestionId,
        choice: Choice,
    ) -> Result<AnswerOutcome, ExamServiceError> {
        let Some(mut session) = self.current() else {
            debug!(%id, "answer ignored: no session");
            return Ok(AnswerOutcome::NoSession);
        };

        session.record_answer(id, choice)?;
        self.persist(&session).await?;

        let mut guard = self.lock()?;
        *guard = Some(session.clone());
        debug!(%id, %choice, "answer recorded");
        Ok(AnswerOutcome::Recorded(session))
    }

    /// Discard the session and its durable copy.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the durable copy cannot be
    /// removed; the in-memory session is kept in that case.
    pub async fn reset(&self) -> Result<(), ExamServiceError> {
        self.store.clear(SESSION_STATE_KEY).await?;
        let mut guard = self.lock()?;
        *guard = None;
        debug!("session reset");
        Ok(())
    }

    /// Snapshot of the current session, or `None` when no exam is live.
    ///
    /// Consumers must treat `None` as "return to topic selection", never as
    /// something to render.
    #[must_use]
    pub fn current(&self) -> Option<ExamSession> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }

    async fn persist(&self, session: &ExamSession) -> Result<(), ExamServiceError> {
        let bytes = serde_json::to_vec(session)?;
        self.store.save(SESSION_STATE_KEY, &bytes).await?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<ExamSession>>, ExamServiceError> {
        self.current.lock().map_err(|_| ExamServiceError::LockPoisoned)
    }
}
