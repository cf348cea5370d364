//! Where raw question text comes from.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use sat_core::model::{QuestionCategory, RawCompletion};
use storage::repository::PromptRepository;
use url::Url;

use crate::completion::CompletionClient;
use crate::error::QuestionSourceError;

pub const DEFAULT_QUESTION_API_URL: &str = "https://sat.techrealm.pk";

/// Produces raw, unparsed text for one category.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` on transport failures, non-2xx statuses,
    /// or when the category cannot be served.
    async fn fetch(&self, category: QuestionCategory)
    -> Result<RawCompletion, QuestionSourceError>;
}

/// Sends the stored prompt for a category to a language model.
#[derive(Clone)]
pub struct PromptedQuestionSource {
    prompts: Arc<dyn PromptRepository>,
    client: Arc<dyn CompletionClient>,
}

impl PromptedQuestionSource {
    #[must_use]
    pub fn new(prompts: Arc<dyn PromptRepository>, client: Arc<dyn CompletionClient>) -> Self {
        Self { prompts, client }
    }
}

#[async_trait]
impl QuestionSource for PromptedQuestionSource {
    async fn fetch(
        &self,
        category: QuestionCategory,
    ) -> Result<RawCompletion, QuestionSourceError> {
        let prompt = self
            .prompts
            .prompt_for_category(category)
            .await?
            .ok_or(QuestionSourceError::MissingPrompt(category))?;
        tracing::info!(%category, prompt = %prompt.id(), "generating question from prompt");
        Ok(self.client.complete(prompt.content()).await?)
    }
}

/// Reads pre-generated questions from the hosted question API.
#[derive(Clone)]
pub struct QuestionApiSource {
    client: Client,
    base_url: Url,
}

impl QuestionApiSource {
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, QuestionSourceError> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Use `SAT_QUESTION_API_URL`, falling back to the public host.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidUrl` if the configured value does not parse.
    pub fn from_env() -> Result<Self, QuestionSourceError> {
        let base_url = env::var("SAT_QUESTION_API_URL")
            .unwrap_or_else(|_| DEFAULT_QUESTION_API_URL.into());
        Self::new(&base_url)
    }

    /// Endpoint serving `category`. Passage and question categories of a
    /// section share one endpoint, which returns both.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::InvalidUrl` if the path cannot be joined.
    pub fn endpoint(&self, category: QuestionCategory) -> Result<Url, QuestionSourceError> {
        let mut url = match category {
            QuestionCategory::MathWithCalculator | QuestionCategory::MathNoCalculator => {
                self.base_url.join("/api/maths-question")?
            }
            QuestionCategory::ReadingPassage | QuestionCategory::ReadingQuestions => {
                self.base_url.join("/api/reading-question")?
            }
            QuestionCategory::WritingPassage | QuestionCategory::WritingQuestions => {
                self.base_url.join("/api/writing-question")?
            }
        };
        match category {
            QuestionCategory::MathWithCalculator => {
                url.query_pairs_mut().append_pair("use_calculator", "true");
            }
            QuestionCategory::MathNoCalculator => {
                url.query_pairs_mut().append_pair("use_calculator", "false");
            }
            _ => {}
        }
        Ok(url)
    }
}

#[async_trait]
impl QuestionSource for QuestionApiSource {
    async fn fetch(
        &self,
        category: QuestionCategory,
    ) -> Result<RawCompletion, QuestionSourceError> {
        let url = self.endpoint(category)?;
        tracing::info!(%category, %url, "requesting hosted question");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }
        Ok(RawCompletion::new(response.text().await?))
    }
}
