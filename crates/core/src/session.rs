use thiserror::Error;

use crate::model::{AnswerLetter, ParsedQuestion, QuestionItem};
use crate::parser::normalize::resolve_answer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question is loaded")]
    NoQuestion,

    #[error("no answer has been selected")]
    NoSelection,
}

/// Result of checking the selected answer against the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCheck {
    Correct {
        answer: AnswerLetter,
    },
    Incorrect {
        selected: Option<AnswerLetter>,
        expected: AnswerLetter,
    },
    /// The item's correct answer never resolved to one of its choices.
    Indeterminate,
}

impl AnswerCheck {
    #[must_use]
    pub fn is_determinate(&self) -> bool {
        !matches!(self, AnswerCheck::Indeterminate)
    }
}

/// Position within the loaded question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub index: usize,
    pub total: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// State of one practice screen: the loaded question set, the item being
/// answered, and the user's current pick.
#[derive(Debug, Clone, Default)]
pub struct PracticeSession {
    question: Option<ParsedQuestion>,
    current: usize,
    selected: Option<String>,
}

impl PracticeSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a new question set, resetting position and selection.
    pub fn replace(&mut self, question: ParsedQuestion) {
        self.question = Some(question);
        self.current = 0;
        self.selected = None;
    }

    #[must_use]
    pub fn question(&self) -> Option<&ParsedQuestion> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&QuestionItem> {
        self.question.as_ref()?.items.get(self.current)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Record the user's pick. Not validated against the item's choices.
    pub fn select_answer(&mut self, answer: impl Into<String>) {
        self.selected = Some(answer.into());
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            index: self.current,
            total: self.question.as_ref().map_or(0, |q| q.items.len()),
        }
    }

    /// Compare the selection with the current item's answer.
    ///
    /// A determinate result on any item but the last moves to the next item
    /// and clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestion` if no item is loaded and
    /// `SessionError::NoSelection` if nothing was selected.
    pub fn check_answer(&mut self) -> Result<AnswerCheck, SessionError> {
        let item = self.current_item().ok_or(SessionError::NoQuestion)?;
        let selected = self.selected.as_deref().ok_or(SessionError::NoSelection)?;

        let check = match item.correct_letter() {
            None => AnswerCheck::Indeterminate,
            Some(expected) => {
                let picked = resolve_answer(selected, &item.choices).letter();
                if picked == Some(expected) {
                    AnswerCheck::Correct { answer: expected }
                } else {
                    AnswerCheck::Incorrect {
                        selected: picked,
                        expected,
                    }
                }
            }
        };

        if check.is_determinate() && !self.progress().is_last() {
            self.current += 1;
            self.selected = None;
        }
        Ok(check)
    }

    /// Move to the next item. Returns `false` at the last item.
    pub fn next(&mut self) -> bool {
        if self.progress().is_last() {
            return false;
        }
        self.current += 1;
        self.selected = None;
        true
    }

    /// Move to the previous item. Returns `false` at the first item.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.selected = None;
        true
    }
}
