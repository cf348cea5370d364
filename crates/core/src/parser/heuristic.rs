//! Heuristic tier: marker-based extraction from free text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{CategoryFamily, ParsedQuestion, QuestionCategory, QuestionItem};
use crate::parser::normalize::{non_blank, normalize_choices, resolve_answer};

static PASSAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#*]*(?:(?:reading|writing)[ \t]+)?passage[ \t*]*:")
        .expect("passage marker regex is invalid")
});

static QUESTIONS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#*]*(?:(?:reading|writing)[ \t]+)?questions[ \t*]*:")
        .expect("questions marker regex is invalid")
});

static BLOCK_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#*]*(?:question[ \t]+\d+[ \t*]*:|\d+[ \t]*\))")
        .expect("block boundary regex is invalid")
});

static LEADING_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[ \t]*\)[ \t]*(.*)$").expect("leading numeral regex is invalid")
});

static CHOICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?([A-E])\)[ \t]*(.*)$").expect("choice line regex is invalid")
});

static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[#*]*[ \t]*question(?:[ \t]+\d+)?[ \t*]*:[ \t*]*(.*)$")
        .expect("question label regex is invalid")
});

static SENTENCE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*]*sentence[ \t*]*:[ \t*]*(.*)$").expect("sentence label regex is invalid")
});

static UNDERLINED_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*]*underlined(?:[ \t]+(?:portion|part|text))?[ \t*]*:[ \t*]*(.*)$")
        .expect("underlined label regex is invalid")
});

static ANSWER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*]*(?:correct[ \t]+)?answer[ \t*]*:[ \t*]*(.*)$")
        .expect("answer label regex is invalid")
});

static CHOICES_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*]*(?:answer[ \t]+)?choices[ \t*]*:?[ \t*]*$")
        .expect("choices header regex is invalid")
});

static EXPLANATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[*]*(?:explanation|rationale)[ \t*]*:").expect("explanation regex is invalid")
});

/// Which labeled field unlabeled continuation lines belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Question,
    Sentence,
    Underlined,
    Choice,
    Answer,
    Ignored,
}

#[derive(Debug, Default)]
struct BlockScan {
    question: Vec<String>,
    sentence: Vec<String>,
    underlined: Vec<String>,
    choices: Vec<String>,
    answer: String,
    loose: Vec<String>,
}

impl BlockScan {
    fn push_text(&mut self, field: Field, line: &str) {
        match field {
            Field::Question => self.question.push(line.to_string()),
            Field::Sentence => self.sentence.push(line.to_string()),
            Field::Underlined => self.underlined.push(line.to_string()),
            Field::Choice => {
                if let Some(last) = self.choices.last_mut() {
                    last.push(' ');
                    last.push_str(line);
                }
            }
            Field::Answer => {
                if self.answer.is_empty() {
                    self.answer = line.to_string();
                }
            }
            Field::None => self.loose.push(line.to_string()),
            Field::Ignored => {}
        }
    }

    fn into_item(self) -> QuestionItem {
        let question = if self.question.is_empty() {
            self.loose.into_iter().next().unwrap_or_default()
        } else {
            self.question.join("\n")
        };
        let choices = normalize_choices(self.choices);
        let correct_answer = resolve_answer(&self.answer, &choices);
        QuestionItem {
            question_text: question.trim().to_string(),
            sentence: joined(self.sentence),
            underlined_span: joined(self.underlined),
            choices,
            correct_answer,
        }
    }
}

fn joined(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        non_blank(Some(lines.join("\n")))
    }
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim().to_string())
}

/// Extract one question from a block of lines.
fn scan_block(block: &str, family: CategoryFamily) -> QuestionItem {
    let mut scan = BlockScan::default();
    let mut field = Field::None;
    let with_sub_fields = family == CategoryFamily::Writing;

    for (index, raw_line) in block.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if index == 0 {
            if let Some(rest) = capture(&LEADING_NUMERAL, line) {
                field = Field::Question;
                if !rest.is_empty() {
                    scan.question.push(rest);
                }
                continue;
            }
        }

        if CHOICE_LINE.is_match(line) {
            scan.choices.push(line.to_string());
            field = Field::Choice;
        } else if let Some(rest) = capture(&ANSWER_LABEL, line) {
            scan.answer = rest;
            field = Field::Answer;
        } else if let Some(rest) = capture(&QUESTION_LABEL, line) {
            field = Field::Question;
            if !rest.is_empty() {
                scan.question.push(rest);
            }
        } else if let Some(rest) = with_sub_fields
            .then(|| capture(&SENTENCE_LABEL, line))
            .flatten()
        {
            field = Field::Sentence;
            if !rest.is_empty() {
                scan.sentence.push(rest);
            }
        } else if let Some(rest) = with_sub_fields
            .then(|| capture(&UNDERLINED_LABEL, line))
            .flatten()
        {
            field = Field::Underlined;
            if !rest.is_empty() {
                scan.underlined.push(rest);
            }
        } else if CHOICES_HEADER.is_match(line) {
            field = Field::None;
        } else if EXPLANATION_LABEL.is_match(line) {
            field = Field::Ignored;
        } else {
            scan.push_text(field, line);
        }
    }

    scan.into_item()
}

/// Splits off the passage. Returns the passage (if marked) and the text holding the questions.
fn split_passage(text: &str) -> (Option<String>, &str) {
    let Some(marker) = PASSAGE_MARKER.find(text) else {
        let rest = QUESTIONS_MARKER
            .find(text)
            .map_or(text, |questions| &text[questions.end()..]);
        return (None, rest);
    };

    let body = &text[marker.end()..];
    if let Some(questions) = QUESTIONS_MARKER.find(body) {
        return (
            non_blank(Some(body[..questions.start()].to_string())),
            &body[questions.end()..],
        );
    }
    match BLOCK_BOUNDARY.find(body) {
        Some(boundary) => (
            non_blank(Some(body[..boundary.start()].to_string())),
            &body[boundary.start()..],
        ),
        None => (non_blank(Some(body.to_string())), ""),
    }
}

/// Splits the question section at `Question <n>:` or leading `<n>)` boundaries.
fn split_blocks(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = BLOCK_BOUNDARY.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![text]
        };
    }
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

fn is_blank_item(item: &QuestionItem) -> bool {
    item.question_text.is_empty()
        && item.choices.is_empty()
        && item.sentence.is_none()
        && item.underlined_span.is_none()
}

/// Best-effort extraction. Never fails; missing pieces come back empty.
pub(crate) fn parse(category: QuestionCategory, text: &str) -> ParsedQuestion {
    let family = category.family();
    match family {
        CategoryFamily::Math => {
            let item = scan_block(text, family);
            ParsedQuestion {
                category,
                passage: None,
                items: vec![item],
            }
        }
        CategoryFamily::Reading | CategoryFamily::Writing => {
            let (passage, rest) = split_passage(text);
            let items = split_blocks(rest)
                .into_iter()
                .map(|block| scan_block(block, family))
                .filter(|item| !is_blank_item(item))
                .collect();
            ParsedQuestion {
                category,
                passage,
                items,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerLetter, CorrectAnswer};

    #[test]
    fn math_question_label_choices_and_answer() {
        let text = "Sure! Here is a question.\nQuestion: If 2x = 10, what is x?\nA) 2\nB) 5\nC) 8\nD) 10\nCorrect Answer: B";
        let parsed = parse(QuestionCategory::MathNoCalculator, text);
        let item = &parsed.items[0];
        assert_eq!(item.question_text, "If 2x = 10, what is x?");
        assert_eq!(item.choices.len(), 4);
        assert_eq!(item.correct_answer, CorrectAnswer::Letter(AnswerLetter::B));
    }

    #[test]
    fn math_without_label_uses_first_line() {
        let text = "What is 7 * 6?\n\nA) 42\nB) 36\nC) 48\nD) 49\ncorrect answer: a";
        let parsed = parse(QuestionCategory::MathWithCalculator, text);
        let item = &parsed.items[0];
        assert_eq!(item.question_text, "What is 7 * 6?");
        assert_eq!(item.correct_letter(), Some(AnswerLetter::A));
    }

    #[test]
    fn multi_line_question_and_trailing_explanation() {
        let text = "Question: A train travels 60 miles per hour.\nHow far does it go in 3 hours?\nA) 120\nB) 180\nC) 200\nD) 240\nCorrect Answer: B\nExplanation: 60 * 3 = 180.";
        let item = &parse(QuestionCategory::MathWithCalculator, text).items[0];
        assert_eq!(
            item.question_text,
            "A train travels 60 miles per hour.\nHow far does it go in 3 hours?"
        );
        assert_eq!(item.choices[3].text(), "240");
    }

    #[test]
    fn reading_passage_and_numbered_blocks() {
        let text = "READING PASSAGE:\nThe tide rose slowly.\nGulls circled.\n\nREADING QUESTIONS:\nQuestion 1: What rose?\nA) The tide\nB) The sun\nC) A gull\nD) A boat\nCorrect Answer: A\n\nQuestion 2: What circled?\nA) Boats\nB) Gulls\nC) Clouds\nD) Kites\nCorrect Answer: B";
        let parsed = parse(QuestionCategory::ReadingQuestions, text);
        assert_eq!(
            parsed.passage.as_deref(),
            Some("The tide rose slowly.\nGulls circled.")
        );
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].question_text, "What rose?");
        assert_eq!(parsed.items[1].question_text, "What circled?");
        assert_eq!(parsed.items[1].correct_letter(), Some(AnswerLetter::B));
    }

    #[test]
    fn reading_blocks_with_leading_numerals() {
        let text = "Passage: Ants share food.\nQuestions:\n1) Who shares?\nA) Ants\nB) Bees\nCorrect Answer: A\n2) What is shared?\nA) Water\nB) Food\nCorrect Answer: B";
        let parsed = parse(QuestionCategory::ReadingPassage, text);
        assert_eq!(parsed.passage.as_deref(), Some("Ants share food."));
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].question_text, "Who shares?");
        assert_eq!(parsed.items[1].choices[1].text(), "Food");
    }

    #[test]
    fn writing_sentence_and_underlined_fields() {
        let text = "Passage: The dog runs fast every day.\nQuestions:\nQuestion 1: Which choice is best?\nSentence: The dog runs.\nUnderlined: runs\nA) NO CHANGE\nB) run\nC) running\nD) ran\nCorrect Answer: A";
        let parsed = parse(QuestionCategory::WritingQuestions, text);
        let item = &parsed.items[0];
        assert_eq!(item.sentence.as_deref(), Some("The dog runs."));
        assert_eq!(item.underlined_span.as_deref(), Some("runs"));
        assert_eq!(item.question_text, "Which choice is best?");
    }

    #[test]
    fn reading_family_ignores_sentence_labels() {
        let text = "Question 1: Pick one\nSentence: not a field here\nA) x\nB) y";
        let item = &parse(QuestionCategory::ReadingQuestions, text).items[0];
        assert!(item.sentence.is_none());
    }

    #[test]
    fn garbage_yields_empty_fields() {
        let parsed = parse(QuestionCategory::MathNoCalculator, "");
        assert_eq!(parsed.items.len(), 1);
        assert!(parsed.items[0].question_text.is_empty());
        assert!(parsed.items[0].choices.is_empty());

        let parsed = parse(QuestionCategory::ReadingQuestions, "   \n  ");
        assert!(parsed.items.is_empty());
        assert!(parsed.passage.is_none());
    }
}
