//! Completion parser: turns a raw model completion into a [`ParsedQuestion`].
//!
//! Two tiers. The strict tier decodes JSON shaped like a question document.
//! When that fails, a category-specific heuristic pulls the question, choices
//! and answer out of labeled free text. Both tiers share the normalization in
//! [`normalize`]. Parsing never fails: an unusable result is reported as
//! [`ParseOutcome::Failure`] carrying whatever partial fields were found.

mod heuristic;
pub mod normalize;
mod strict;

use crate::model::{ParsedQuestion, QuestionCategory, RawCompletion};

/// Tier label of a [`ParseOutcome`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseTier {
    Strict,
    Heuristic,
    Failure,
}

impl ParseTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParseTier::Strict => "strict",
            ParseTier::Heuristic => "heuristic",
            ParseTier::Failure => "failure",
        }
    }
}

impl std::fmt::Display for ParseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Strict(ParsedQuestion),
    Heuristic(ParsedQuestion),
    Failure(ParsedQuestion),
}

impl ParseOutcome {
    #[must_use]
    pub fn question(&self) -> &ParsedQuestion {
        match self {
            ParseOutcome::Strict(q) | ParseOutcome::Heuristic(q) | ParseOutcome::Failure(q) => q,
        }
    }

    #[must_use]
    pub fn into_question(self) -> ParsedQuestion {
        match self {
            ParseOutcome::Strict(q) | ParseOutcome::Heuristic(q) | ParseOutcome::Failure(q) => q,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, ParseOutcome::Failure(_))
    }

    #[must_use]
    pub fn tier(&self) -> ParseTier {
        match self {
            ParseOutcome::Strict(_) => ParseTier::Strict,
            ParseOutcome::Heuristic(_) => ParseTier::Heuristic,
            ParseOutcome::Failure(_) => ParseTier::Failure,
        }
    }
}

/// Parse a completion for the given category. Pure; performs no I/O.
#[must_use]
pub fn parse_completion(category: QuestionCategory, raw: &RawCompletion) -> ParseOutcome {
    if let Some(question) = strict::parse(category, raw.as_str()) {
        return ParseOutcome::Strict(question);
    }

    let question = heuristic::parse(category, raw.as_str());
    if question.is_usable() {
        ParseOutcome::Heuristic(question)
    } else {
        ParseOutcome::Failure(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerLetter, CorrectAnswer};

    fn parse(category: QuestionCategory, text: &str) -> ParseOutcome {
        parse_completion(category, &RawCompletion::from(text))
    }

    #[test]
    fn strict_output_round_trips_through_serialization() {
        let text = r#"{"passage": "Salmon return upstream.", "questions": [
            {"question": "Why?", "choices": ["A) to spawn", "B) to feed", "Choices", "C) to rest"], "correct_answer": "A"},
            {"question": "When?", "choices": ["A) spring", "B) fall"], "correctAnswer": "unclear"}
        ]}"#;
        let first = parse(QuestionCategory::ReadingQuestions, text);
        assert!(matches!(first, ParseOutcome::Strict(_)));

        let encoded = serde_json::to_string(first.question()).unwrap();
        let second = parse(QuestionCategory::ReadingQuestions, &encoded);
        assert_eq!(second, first);
    }

    #[test]
    fn heuristic_labeled_choices_and_answer() {
        let outcome = parse(
            QuestionCategory::MathWithCalculator,
            "Question: pick\nA) x\nB) y\nC) z\nD) w\nCorrect Answer: C",
        );
        assert!(matches!(outcome, ParseOutcome::Heuristic(_)));
        let item = &outcome.question().items[0];
        let texts: Vec<&str> = item.choices.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["x", "y", "z", "w"]);
        assert_eq!(item.correct_answer, CorrectAnswer::Letter(AnswerLetter::C));
    }

    #[test]
    fn placeholder_choice_never_survives_either_tier() {
        let strict = parse(
            QuestionCategory::MathNoCalculator,
            r#"{"question": "q", "choices": ["choices", "A) 1", "B) 2"], "correctAnswer": "A"}"#,
        );
        let heuristic = parse(
            QuestionCategory::MathNoCalculator,
            "Question: q\nA) Choices\nB) 1\nC) 2\nCorrect Answer: B",
        );
        for outcome in [strict, heuristic] {
            let item = &outcome.question().items[0];
            assert_eq!(item.choices.len(), 2);
            assert!(
                item.choices
                    .iter()
                    .all(|c| c.text().trim().to_lowercase() != "choices")
            );
        }
    }

    #[test]
    fn unusable_text_is_a_failure_with_empty_fields() {
        let outcome = parse(
            QuestionCategory::MathNoCalculator,
            "I'm sorry, I can't help with that.",
        );
        assert!(outcome.is_failure());
        let item = &outcome.question().items[0];
        assert!(item.choices.is_empty());
        assert_eq!(item.question_text, "I'm sorry, I can't help with that.");
    }

    #[test]
    fn empty_json_array_is_not_a_strict_success() {
        let outcome = parse(QuestionCategory::ReadingQuestions, "[]");
        assert!(outcome.is_failure());
    }

    #[test]
    fn two_plus_two_parses() {
        let outcome = parse(
            QuestionCategory::MathNoCalculator,
            "Question: 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect Answer: B",
        );
        let item = &outcome.question().items[0];
        assert_eq!(item.question_text, "2+2?");
        assert_eq!(item.choices.len(), 4);
        assert_eq!(item.correct_letter(), Some(AnswerLetter::B));
    }

    #[test]
    fn writing_sentence_without_question_label_is_usable() {
        let outcome = parse(
            QuestionCategory::WritingQuestions,
            "Sentence: The dog runs.\nUnderlined: runs\nA) NO CHANGE\nB) run\nC) ran\nD) running\nCorrect Answer: A",
        );
        assert_eq!(outcome.tier(), ParseTier::Heuristic);
        let item = &outcome.question().items[0];
        assert_eq!(item.sentence.as_deref(), Some("The dog runs."));
        assert_eq!(item.underlined_span.as_deref(), Some("runs"));
        assert_eq!(item.correct_letter(), Some(AnswerLetter::A));
    }
}
