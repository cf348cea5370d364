use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::category::QuestionCategory;
use crate::model::ids::PromptId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PromptError {
    #[error("prompt content cannot be empty")]
    EmptyContent,

    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

/// Instruction text sent to the language model for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    id: PromptId,
    category: QuestionCategory,
    content: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Prompt {
    /// Create a prompt stamped with `now` for both timestamps.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::EmptyContent` if the content is blank.
    pub fn new(
        id: PromptId,
        category: QuestionCategory,
        content: impl Into<String>,
        is_default: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, PromptError> {
        Self::from_persisted(id, category, content.into(), is_default, now, now)
    }

    /// Rehydrate a prompt from storage.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the content is blank or the timestamps are inverted.
    pub fn from_persisted(
        id: PromptId,
        category: QuestionCategory,
        content: String,
        is_default: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, PromptError> {
        if content.trim().is_empty() {
            return Err(PromptError::EmptyContent);
        }
        if updated_at < created_at {
            return Err(PromptError::InvalidTimeRange);
        }
        Ok(Self {
            id,
            category,
            content,
            is_default,
            created_at,
            updated_at,
        })
    }

    /// Replace the prompt text.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::EmptyContent` if the new content is blank; the prompt is unchanged.
    pub fn edit_content(
        &mut self,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), PromptError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PromptError::EmptyContent);
        }
        self.content = content;
        self.updated_at = now.max(self.created_at);
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> PromptId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> QuestionCategory {
        self.category
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn prompt() -> Prompt {
        Prompt::new(
            PromptId::generate(),
            QuestionCategory::MathNoCalculator,
            "Create a question.",
            true,
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn blank_content_is_rejected() {
        let err = Prompt::new(
            PromptId::generate(),
            QuestionCategory::ReadingPassage,
            "   ",
            false,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, PromptError::EmptyContent);
    }

    #[test]
    fn edit_bumps_updated_at() {
        let mut prompt = prompt();
        let later = fixed_now() + Duration::hours(2);
        prompt.edit_content("Create a harder question.", later).unwrap();
        assert_eq!(prompt.content(), "Create a harder question.");
        assert_eq!(prompt.updated_at(), later);
        assert_eq!(prompt.created_at(), fixed_now());
    }

    #[test]
    fn failed_edit_keeps_previous_content() {
        let mut prompt = prompt();
        assert!(prompt.edit_content("", fixed_now()).is_err());
        assert_eq!(prompt.content(), "Create a question.");
    }

    #[test]
    fn inverted_timestamps_are_rejected() {
        let err = Prompt::from_persisted(
            PromptId::generate(),
            QuestionCategory::WritingQuestions,
            "x".into(),
            false,
            fixed_now(),
            fixed_now() - Duration::seconds(1),
        )
        .unwrap_err();
        assert_eq!(err, PromptError::InvalidTimeRange);
    }
}
