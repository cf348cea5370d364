//! Shared error types for the services crate.

use thiserror::Error;

use sat_core::SessionError;
use sat_core::model::{PromptError, QuestionCategory};
use storage::repository::StorageError;

/// Errors emitted by a `CompletionClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("completion client is not configured")]
    Disabled,
    #[error("completion service returned an empty response")]
    EmptyResponse,
    #[error("completion request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while fetching raw question text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("no prompt is stored for {0}")]
    MissingPrompt(QuestionCategory),
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("invalid question API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PracticeController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("failed to fetch question: {0}")]
    Network(#[from] QuestionSourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `AdminConsole`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("sign in to access the admin console")]
    SignInRequired,
    #[error("you don't have permission to access this page")]
    AccessDenied,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
