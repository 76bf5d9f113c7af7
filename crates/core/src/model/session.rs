use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Choice, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("an exam session needs at least one question")]
    Empty,

    #[error("duplicate question id: {id}")]
    DuplicateQuestion { id: QuestionId },

    #[error("question {id} is not part of this session")]
    UnknownQuestion { id: QuestionId },
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Derived result of a session: how many recorded answers match the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamScore {
    pub correct: u32,
    pub total: u32,
}

impl fmt::Display for ExamScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One exam attempt: a fixed question sequence plus the answers recorded so
/// far.
///
/// The question order is set at creation and determines presentation order.
/// `answers` always holds exactly one entry per question; `None` marks an
/// unanswered question. Completion is derived, never stored: answering the
/// last question does not change the session's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    questions: Vec<Question>,
    answers: BTreeMap<QuestionId, Option<Choice>>,
    started_at: DateTime<Utc>,
}

impl ExamSession {
    /// Start a session over the given questions, all unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for an empty sequence and
    /// `SessionError::DuplicateQuestion` if two questions share an id.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut answers = BTreeMap::new();
        for question in &questions {
            if answers.insert(question.id().clone(), None).is_some() {
                return Err(SessionError::DuplicateQuestion {
                    id: question.id().clone(),
                });
            }
        }

        Ok(Self {
            questions,
            answers,
            started_at,
        })
    }

    /// Record (or overwrite) the answer for one question. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the id is not part of this
    /// session.
    pub fn record_answer(&mut self, id: &QuestionId, choice: Choice) -> Result<(), SessionError> {
        match self.answers.get_mut(id) {
            Some(slot) => {
                *slot = Some(choice);
                Ok(())
            }
            None => Err(SessionError::UnknownQuestion { id: id.clone() }),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The recorded answer for a question, `None` while unanswered.
    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<Choice> {
        self.answers.get(id).copied().flatten()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_some()).count()
    }

    /// True once every question has a recorded answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.values().all(Option::is_some)
    }

    /// Count recorded answers that match each question's key.
    #[must_use]
    pub fn score(&self) -> ExamScore {
        let correct = self
            .questions
            .iter()
            .filter(|q| self.answer_for(q.id()) == Some(q.correct()))
            .count();

        ExamScore {
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
