use serde::{Serialize, Serializer};
use std::fmt;

use crate::model::category::QuestionCategory;

/// Opaque text returned by the language model or the question API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCompletion(String);

impl RawCompletion {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawCompletion {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawCompletion {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//
// ─── ANSWER LETTERS ────────────────────────────────────────────────────────────
//

/// Position-derived label of a choice. SAT items carry at most five choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
    E,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 5] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
        AnswerLetter::E,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive conversion from a single character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(AnswerLetter::A),
            'B' => Some(AnswerLetter::B),
            'C' => Some(AnswerLetter::C),
            'D' => Some(AnswerLetter::D),
            'E' => Some(AnswerLetter::E),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            AnswerLetter::A => 'A',
            AnswerLetter::B => 'B',
            AnswerLetter::C => 'C',
            AnswerLetter::D => 'D',
            AnswerLetter::E => 'E',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for AnswerLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//
// ─── CHOICES AND ANSWERS ───────────────────────────────────────────────────────
//

/// A single answer choice with its label stripped from the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    letter: AnswerLetter,
    text: String,
}

impl Choice {
    #[must_use]
    pub fn new(letter: AnswerLetter, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn letter(&self) -> AnswerLetter {
        self.letter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display form, e.g. `B) 4`.
    #[must_use]
    pub fn labeled(&self) -> String {
        format!("{}) {}", self.letter, self.text)
    }
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.labeled())
    }
}

/// The normalized correct-answer field of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectAnswer {
    Letter(AnswerLetter),
    /// Nothing in the raw field resolved to `A`-`E`. Kept for display.
    Unresolved(String),
}

impl Default for CorrectAnswer {
    fn default() -> Self {
        CorrectAnswer::Unresolved(String::new())
    }
}

impl CorrectAnswer {
    #[must_use]
    pub fn letter(&self) -> Option<AnswerLetter> {
        match self {
            CorrectAnswer::Letter(letter) => Some(*letter),
            CorrectAnswer::Unresolved(_) => None,
        }
    }
}

impl fmt::Display for CorrectAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectAnswer::Letter(letter) => write!(f, "{letter}"),
            CorrectAnswer::Unresolved(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for CorrectAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//
// ─── ITEMS ─────────────────────────────────────────────────────────────────────
//

/// One multiple-choice question. Writing items may carry a sentence and underlined span.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlined_span: Option<String>,
    pub choices: Vec<Choice>,
    pub correct_answer: CorrectAnswer,
}

impl QuestionItem {
    /// An item is usable when it has a prompt (question or writing sentence)
    /// and something to pick.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        let has_prompt = !self.question_text.trim().is_empty()
            || self
                .sentence
                .as_deref()
                .is_some_and(|sentence| !sentence.trim().is_empty());
        has_prompt && !self.choices.is_empty()
    }

    /// The correct letter, only if it names one of this item's choices.
    #[must_use]
    pub fn correct_letter(&self) -> Option<AnswerLetter> {
        self.correct_answer
            .letter()
            .filter(|letter| letter.index() < self.choices.len())
    }
}

/// Structured result of parsing one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuestion {
    #[serde(skip)]
    pub category: QuestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    pub items: Vec<QuestionItem>,
}

impl ParsedQuestion {
    #[must_use]
    pub fn empty(category: QuestionCategory) -> Self {
        Self {
            category,
            passage: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_passage(&self) -> bool {
        self.passage
            .as_deref()
            .is_some_and(|passage| !passage.trim().is_empty())
    }

    /// True when something can be shown to the user.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.items.iter().any(QuestionItem::is_usable)
            || (self.category.expects_passage() && self.has_passage())
    }
}
