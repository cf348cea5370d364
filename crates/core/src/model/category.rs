use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("unknown question category: {0}")]
    Unknown(String),
}

/// The six fixed kinds of SAT practice questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    ReadingPassage,
    ReadingQuestions,
    WritingPassage,
    WritingQuestions,
    MathWithCalculator,
    MathNoCalculator,
}

/// Grouping used to pick the text-extraction strategy for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFamily {
    Reading,
    Writing,
    Math,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 6] = [
        QuestionCategory::ReadingPassage,
        QuestionCategory::ReadingQuestions,
        QuestionCategory::WritingPassage,
        QuestionCategory::WritingQuestions,
        QuestionCategory::MathWithCalculator,
        QuestionCategory::MathNoCalculator,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::ReadingPassage => "reading_passage",
            QuestionCategory::ReadingQuestions => "reading_questions",
            QuestionCategory::WritingPassage => "writing_passage",
            QuestionCategory::WritingQuestions => "writing_questions",
            QuestionCategory::MathWithCalculator => "math_with_calculator",
            QuestionCategory::MathNoCalculator => "math_no_calculator",
        }
    }

    #[must_use]
    pub fn family(self) -> CategoryFamily {
        match self {
            QuestionCategory::ReadingPassage | QuestionCategory::ReadingQuestions => {
                CategoryFamily::Reading
            }
            QuestionCategory::WritingPassage | QuestionCategory::WritingQuestions => {
                CategoryFamily::Writing
            }
            QuestionCategory::MathWithCalculator | QuestionCategory::MathNoCalculator => {
                CategoryFamily::Math
            }
        }
    }

    /// Passage categories may legitimately produce a passage with no questions.
    #[must_use]
    pub fn expects_passage(self) -> bool {
        matches!(
            self,
            QuestionCategory::ReadingPassage | QuestionCategory::WritingPassage
        )
    }

    /// Human label used by the terminal front-end.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionCategory::ReadingPassage => "Reading (passage)",
            QuestionCategory::ReadingQuestions => "Reading (questions)",
            QuestionCategory::WritingPassage => "Writing (passage)",
            QuestionCategory::WritingQuestions => "Writing (questions)",
            QuestionCategory::MathWithCalculator => "Math (calculator)",
            QuestionCategory::MathNoCalculator => "Math (no calculator)",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        QuestionCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| CategoryError::Unknown(s.to_string()))
    }
}
