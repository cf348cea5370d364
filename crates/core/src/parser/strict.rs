//! Strict tier: the model did what it was told and returned JSON.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{ParsedQuestion, QuestionCategory, QuestionItem};
use crate::parser::normalize::{non_blank, normalize_choices, resolve_answer};

/// Top-level document. Accepts the serialized `ParsedQuestion`, the math shape,
/// and the passage-plus-questions shape used by the question API.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    passage: Option<String>,
    #[serde(alias = "questions")]
    items: Option<Vec<RawItem>>,
    #[serde(alias = "questionText", alias = "question_text", alias = "content")]
    question: Option<String>,
    sentence: Option<String>,
    #[serde(alias = "underlinedSpan", alias = "underlined_span")]
    underlined: Option<String>,
    choices: Option<Value>,
    #[serde(alias = "correctAnswer", alias = "answer")]
    correct_answer: Option<Value>,
}

impl RawDocument {
    /// Splits into the passage and the item list; a top-level question becomes the only item.
    fn into_parts(self) -> (Option<String>, Vec<RawItem>) {
        if let Some(items) = self.items {
            return (self.passage, items);
        }
        let single = RawItem {
            question: self.question,
            sentence: self.sentence,
            underlined: self.underlined,
            choices: self.choices,
            correct_answer: self.correct_answer,
        };
        let items = if single.is_present() {
            vec![single]
        } else {
            Vec::new()
        };
        (self.passage, items)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    #[serde(alias = "questionText", alias = "question_text", alias = "content")]
    question: Option<String>,
    sentence: Option<String>,
    #[serde(alias = "underlinedSpan", alias = "underlined_span")]
    underlined: Option<String>,
    choices: Option<Value>,
    #[serde(alias = "correctAnswer", alias = "answer")]
    correct_answer: Option<Value>,
}

impl RawItem {
    fn is_present(&self) -> bool {
        self.question.is_some() || self.choices.is_some()
    }

    fn into_item(self) -> QuestionItem {
        let choices = normalize_choices(choice_entries(self.choices));
        let correct_answer = resolve_answer(&scalar_text(self.correct_answer), &choices);
        QuestionItem {
            question_text: non_blank(self.question).unwrap_or_default(),
            sentence: non_blank(self.sentence),
            underlined_span: non_blank(self.underlined),
            choices,
            correct_answer,
        }
    }
}

/// Choices arrive as a list of strings or as a `{"A": "...", "B": "..."}` map.
fn choice_entries(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .map(|entry| scalar_text(Some(entry)))
            .collect(),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(label, text)| format!("{label}) {}", scalar_text(Some(text))))
            .collect(),
        Some(other) => vec![scalar_text(Some(other))],
        None => Vec::new(),
    }
}

fn scalar_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Text spans worth trying as JSON, most literal first.
fn candidates(text: &str) -> Vec<&str> {
    let trimmed = text.trim();
    let mut out = vec![trimmed];

    if let Some(body) = fenced_body(trimmed) {
        out.push(body);
    }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            out.push(&trimmed[start..=end]);
        }
    }
    out
}

/// Body of a markdown code fence such as ```` ```json ... ``` ````.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let body_start = after.find('\n')? + 1;
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn decode(text: &str) -> Option<(Option<String>, Vec<RawItem>)> {
    for candidate in candidates(text) {
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        match value {
            Value::Object(_) => {
                let Ok(doc) = serde_json::from_value::<RawDocument>(value) else {
                    continue;
                };
                let (passage, items) = doc.into_parts();
                if passage.is_none() && items.is_empty() {
                    continue;
                }
                return Some((passage, items));
            }
            Value::Array(_) => {
                let Ok(items) = serde_json::from_value::<Vec<RawItem>>(value) else {
                    continue;
                };
                let items: Vec<RawItem> = items.into_iter().filter(RawItem::is_present).collect();
                if !items.is_empty() {
                    return Some((None, items));
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode `text` as a structured question, or `None` if it is not one.
pub(crate) fn parse(category: QuestionCategory, text: &str) -> Option<ParsedQuestion> {
    let (passage, items) = decode(text)?;
    Some(ParsedQuestion {
        category,
        passage: non_blank(passage),
        items: items.into_iter().map(RawItem::into_item).collect(),
    })
}
