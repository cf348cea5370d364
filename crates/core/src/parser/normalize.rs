//! Normalization shared by both parser tiers and by answer checking.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{AnswerLetter, Choice, CorrectAnswer};

static CHOICE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\(\[]?[A-Ea-e][\)\]]\s*").expect("choice label regex is invalid")
});

static STANDALONE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-E])\b").expect("standalone letter regex is invalid"));

/// Removes a leading `B)` / `(B)` label and surrounding whitespace.
#[must_use]
pub fn strip_choice_label(raw: &str) -> &str {
    match CHOICE_LABEL.find(raw) {
        Some(label) => raw[label.end()..].trim(),
        None => raw.trim(),
    }
}

/// Malformed output sometimes lists the word "choices" as if it were an option.
#[must_use]
pub fn is_placeholder_choice(text: &str) -> bool {
    text.trim()
        .trim_end_matches(':')
        .trim_end()
        .eq_ignore_ascii_case("choices")
}

/// Strips labels, drops empty and placeholder entries, and relabels by position.
///
/// Entries past the fifth are discarded: there is no letter for them.
pub fn normalize_choices<I, S>(raw: I) -> Vec<Choice>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|entry| strip_choice_label(entry.as_ref()).to_string())
        .filter(|text| !text.is_empty() && !is_placeholder_choice(text))
        .zip(AnswerLetter::ALL)
        .map(|(text, letter)| Choice::new(letter, text))
        .collect()
}

/// Letter at the very start of the field, as in `B`, `b)`, `(C)` or `D. 12`.
///
/// A lowercase letter followed by a space is read as a word ("a dog"), not a label.
fn leading_label(field: &str) -> Option<AnswerLetter> {
    let rest = field.trim_start_matches(['(', '[']);
    let mut chars = rest.chars();
    let first = chars.next()?;
    let letter = AnswerLetter::from_char(first)?;
    match chars.next() {
        None | Some(')' | ']' | '.' | ':' | ',') => Some(letter),
        Some(c) if c.is_whitespace() && first.is_ascii_uppercase() => Some(letter),
        _ => None,
    }
}

/// Resolves a free-form answer field (or a user selection) to a letter.
///
/// In order: a case-insensitive match against a choice's text (as given, then
/// with any label stripped), a leading label, then the first standalone
/// capital `A`-`E`. Anything else stays `Unresolved`.
///
/// Text is matched first so article-initial choices ("A critique of...") are
/// not mistaken for the label `A`.
#[must_use]
pub fn resolve_answer(raw: &str, choices: &[Choice]) -> CorrectAnswer {
    let field = raw.trim();
    if field.is_empty() {
        return CorrectAnswer::Unresolved(String::new());
    }

    let bare = strip_choice_label(field);
    for candidate in [field, bare] {
        if let Some(choice) = choices
            .iter()
            .find(|choice| choice.text().eq_ignore_ascii_case(candidate))
        {
            return CorrectAnswer::Letter(choice.letter());
        }
    }

    if let Some(letter) = leading_label(field) {
        return CorrectAnswer::Letter(letter);
    }

    STANDALONE_LETTER
        .captures(field)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(AnswerLetter::from_char)
        .map_or_else(
            || CorrectAnswer::Unresolved(field.to_string()),
            CorrectAnswer::Letter,
        )
}

/// Trims and turns blank text into `None`.
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
