use std::sync::Arc;

use sat_core::model::{AnswerLetter, CurrentUser, QuestionCategory, RawCompletion, ResponseLogEntry};
use sat_core::parser::normalize::resolve_answer;
use sat_core::{AnswerCheck, Clock, ParseTier, PracticeSession, SessionProgress, parse_completion};
use storage::repository::ResponseLogRepository;

use crate::error::{PracticeError, QuestionSourceError};
use crate::source::QuestionSource;

/// Issued by [`PracticeController::begin_request`]; only the newest ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    category: QuestionCategory,
    generation: u64,
}

impl RequestTicket {
    #[must_use]
    pub fn category(&self) -> QuestionCategory {
        self.category
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a fetched completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Parsed and loaded into the session by the given tier.
    Loaded(ParseTier),
    /// A newer request was issued meanwhile; the session was left alone.
    Stale,
}

/// Drives one practice screen: fetches questions, parses them, and forwards
/// answer checks and navigation to the owned [`PracticeSession`].
pub struct PracticeController {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    responses: Arc<dyn ResponseLogRepository>,
    user: CurrentUser,
    session: PracticeSession,
    category: Option<QuestionCategory>,
    generation: u64,
}

impl PracticeController {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        responses: Arc<dyn ResponseLogRepository>,
    ) -> Self {
        Self {
            clock,
            source,
            responses,
            user: CurrentUser::Anonymous,
            session: PracticeSession::new(),
            category: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: CurrentUser) -> Self {
        self.user = user;
        self
    }

    #[must_use]
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    /// Category of the loaded question set.
    #[must_use]
    pub fn category(&self) -> Option<QuestionCategory> {
        self.category
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin_request(&mut self, category: QuestionCategory) -> RequestTicket {
        self.generation += 1;
        RequestTicket {
            category,
            generation: self.generation,
        }
    }

    /// Parse a fetched completion into the session if `ticket` is still current.
    ///
    /// Parse failures still load: the session then holds whatever partial
    /// fields were recovered.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Network` if the current request's fetch failed;
    /// the session keeps its previous state.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<RawCompletion, QuestionSourceError>,
    ) -> Result<Applied, PracticeError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                category = %ticket.category,
                generation = ticket.generation,
                latest = self.generation,
                "dropping stale response"
            );
            return Ok(Applied::Stale);
        }

        let raw = result?;
        let outcome = parse_completion(ticket.category, &raw);
        let tier = outcome.tier();
        tracing::debug!(category = %ticket.category, %tier, "parsed completion");
        if tier == ParseTier::Failure {
            tracing::warn!(category = %ticket.category, "completion produced no usable question");
        }

        self.session.replace(outcome.into_question());
        self.category = Some(ticket.category);
        Ok(Applied::Loaded(tier))
    }

    /// Fetch, parse and load a question set for `category`, then log it.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Network` if the source fails.
    pub async fn request_category(
        &mut self,
        category: QuestionCategory,
    ) -> Result<Applied, PracticeError> {
        let ticket = self.begin_request(category);
        tracing::info!(%category, generation = ticket.generation, "requesting question");
        let result = self.source.fetch(category).await;
        let applied = self.apply(ticket, result)?;
        if matches!(applied, Applied::Loaded(tier) if tier != ParseTier::Failure) {
            self.log_response().await;
        }
        Ok(applied)
    }

    pub fn select_answer(&mut self, answer: impl Into<String>) {
        self.session.select_answer(answer);
    }

    /// # Errors
    ///
    /// Returns `PracticeError::Session` when nothing is loaded or selected.
    pub fn check_answer(&mut self) -> Result<AnswerCheck, PracticeError> {
        Ok(self.session.check_answer()?)
    }

    /// Letter currently selected, if it names one of the item's choices.
    #[must_use]
    pub fn selected_letter(&self) -> Option<AnswerLetter> {
        let item = self.session.current_item()?;
        let selected = self.session.selected_answer()?;
        resolve_answer(selected, &item.choices).letter()
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    // Best effort: the practice flow never reads these rows back.
    async fn log_response(&self) {
        let Some(question) = self.session.question() else {
            return;
        };
        let entry =
            match ResponseLogEntry::from_question(question, self.user.user_id(), self.clock.now()) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode response log entry");
                    return;
                }
            };
        if let Err(err) = self.responses.append_response(&entry).await {
            tracing::warn!(error = %err, "failed to write response log");
        }
    }
}
