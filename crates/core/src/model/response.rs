use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::category::QuestionCategory;
use crate::model::ids::UserId;
use crate::model::question::ParsedQuestion;

/// Row written after a question set is shown. Never read back by the practice flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLogEntry {
    pub question_type: QuestionCategory,
    pub passage: Option<String>,
    pub questions: serde_json::Value,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl ResponseLogEntry {
    /// Snapshot a parsed question for logging.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the items cannot be encoded.
    pub fn from_question(
        question: &ParsedQuestion,
        user_id: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            question_type: question.category,
            passage: question.passage.clone(),
            questions: serde_json::to_value(&question.items)?,
            user_id,
            created_at,
        })
    }
}
