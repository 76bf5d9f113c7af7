use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{QuestionId, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {choice} cannot be empty")]
    EmptyOption { choice: Choice },

    #[error("invalid answer label: {raw:?}")]
    InvalidAnswer { raw: String },
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// One of the four answer labels of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// All labels in presentation order.
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Choice::A => "a",
            Choice::B => "b",
            Choice::C => "c",
            Choice::D => "d",
        }
    }

    /// Position of this label within an option list.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Choice {
    type Err = QuestionError;

    /// Parses an answer label, tolerating surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Choice::A),
            "b" => Ok(Choice::B),
            "c" => Ok(Choice::C),
            "d" => Ok(Choice::D),
            _ => Err(QuestionError::InvalidAnswer { raw: s.to_owned() }),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Raw question fields before normalization, as read from an import row or a
/// persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub topic: TopicId,
    pub text: String,
    pub options: [String; 4],
    pub answer: String,
}

impl QuestionDraft {
    /// Normalize and validate the draft into an immutable `Question`.
    ///
    /// Text fields are trimmed and the answer label is lowercased before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id, text, or any option trims to empty,
    /// or if the answer is not one of the four labels.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }

        let text = self.text.trim();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let mut options: [String; 4] = Default::default();
        for (choice, raw) in Choice::ALL.into_iter().zip(self.options) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(QuestionError::EmptyOption { choice });
            }
            options[choice.index()] = trimmed.to_owned();
        }

        let correct = self.answer.parse::<Choice>()?;

        Ok(Question {
            id: QuestionId::new(id),
            topic: self.topic,
            text: text.to_owned(),
            options,
            correct,
        })
    }
}

/// An immutable multiple-choice question.
///
/// The four options map positionally to the labels a/b/c/d; the array type
/// keeps the "exactly four options" invariant out of runtime checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    topic: TopicId,
    text: String,
    options: [String; 4],
    correct: Choice,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn topic(&self) -> TopicId {
        self.topic
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    /// The option text shown next to the given label.
    #[must_use]
    pub fn option(&self, choice: Choice) -> &str {
        &self.options[choice.index()]
    }

    #[must_use]
    pub fn correct(&self) -> Choice {
        self.correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
