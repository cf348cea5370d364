//! User-facing notifications, so outer surfaces never format errors themselves.

use std::fmt;

use sat_core::AnswerCheck;

use crate::error::{AdminError, PracticeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn for_check(check: &AnswerCheck) -> Self {
        match check {
            AnswerCheck::Correct { .. } => Self::new(
                NoticeKind::Success,
                "Correct!",
                "Great job! Try another question.",
            ),
            AnswerCheck::Incorrect { expected, .. } => Self::new(
                NoticeKind::Error,
                "Incorrect",
                format!("The correct answer was {expected}"),
            ),
            AnswerCheck::Indeterminate => Self::new(
                NoticeKind::Info,
                "Answer unavailable",
                "This question has no usable answer key.",
            ),
        }
    }

    #[must_use]
    pub fn for_practice_error(err: &PracticeError) -> Self {
        match err {
            PracticeError::Network(source) => Self::new(
                NoticeKind::Error,
                "Error",
                format!("Failed to generate question. {source}"),
            ),
            other => Self::new(NoticeKind::Info, "Nothing to check", other.to_string()),
        }
    }

    #[must_use]
    pub fn for_admin_error(err: &AdminError) -> Self {
        match err {
            AdminError::SignInRequired => Self::new(
                NoticeKind::Error,
                "Sign in required",
                "Sign in to access the admin console.",
            ),
            AdminError::AccessDenied => Self::new(
                NoticeKind::Error,
                "Access Denied",
                "You don't have permission to access this page.",
            ),
            other => Self::new(NoticeKind::Error, "Error", other.to_string()),
        }
    }

    #[must_use]
    pub fn prompts_unavailable() -> Self {
        Self::new(NoticeKind::Error, "Error", "Failed to fetch prompts")
    }

    #[must_use]
    pub fn prompt_saved() -> Self {
        Self::new(NoticeKind::Success, "Success", "Prompt updated successfully")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sat_core::model::AnswerLetter;

    #[test]
    fn incorrect_names_expected_letter() {
        let notice = Notice::for_check(&AnswerCheck::Incorrect {
            selected: Some(AnswerLetter::A),
            expected: AnswerLetter::C,
        });
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.description, "The correct answer was C");
    }

    #[test]
    fn indeterminate_is_not_reported_as_wrong() {
        let notice = Notice::for_check(&AnswerCheck::Indeterminate);
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_ne!(notice.title, "Incorrect");
    }

    #[test]
    fn access_denied_matches_console_copy() {
        let notice = Notice::for_admin_error(&AdminError::AccessDenied);
        assert_eq!(notice.to_string(), "Access Denied: You don't have permission to access this page.");
    }
}
