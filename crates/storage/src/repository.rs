use async_trait::async_trait;
use sat_core::model::{Prompt, PromptId, QuestionCategory, ResponseLogEntry, UserId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Prompt store: one or more prompts per question category.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// All prompts ordered by category, oldest first within a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if prompts cannot be read.
    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError>;

    /// The prompt used to generate questions for `category`: the oldest one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the prompt cannot be read.
    async fn prompt_for_category(
        &self,
        category: QuestionCategory,
    ) -> Result<Option<Prompt>, StorageError>;

    /// Fetch a prompt by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_prompt(&self, id: PromptId) -> Result<Prompt, StorageError>;

    /// Insert a new prompt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a prompt with the same ID exists.
    async fn insert_prompt(&self, prompt: &Prompt) -> Result<(), StorageError>;

    /// Save content and `updated_at` of an existing prompt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the prompt does not exist.
    async fn update_prompt(&self, prompt: &Prompt) -> Result<(), StorageError>;
}

/// Allow-list of users who may use the admin console.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the allow-list cannot be read.
    async fn is_admin(&self, user: UserId) -> Result<bool, StorageError>;

    /// Add a user to the allow-list. Adding an existing admin is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn add_admin(&self, user: UserId) -> Result<(), StorageError>;
}

/// Append-only log of question sets shown to users.
#[async_trait]
pub trait ResponseLogRepository: Send + Sync {
    /// Append an entry and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be written.
    async fn append_response(&self, entry: &ResponseLogEntry) -> Result<i64, StorageError>;

    /// Newest entries first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if entries cannot be read.
    async fn recent_responses(&self, limit: u32) -> Result<Vec<ResponseLogEntry>, StorageError>;
}

pub(crate) fn sort_prompts(prompts: &mut [Prompt]) {
    prompts.sort_by(|a, b| {
        a.category()
            .cmp(&b.category())
            .then(a.created_at().cmp(&b.created_at()))
    });
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    prompts: Arc<Mutex<Vec<Prompt>>>,
    admins: Arc<Mutex<HashSet<UserId>>>,
    responses: Arc<Mutex<Vec<ResponseLogEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl PromptRepository for InMemoryRepository {
    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        let mut prompts = self.prompts.lock().map_err(poisoned)?.clone();
        sort_prompts(&mut prompts);
        Ok(prompts)
    }

    async fn prompt_for_category(
        &self,
        category: QuestionCategory,
    ) -> Result<Option<Prompt>, StorageError> {
        let guard = self.prompts.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|p| p.category() == category)
            .min_by_key(|p| p.created_at())
            .cloned())
    }

    async fn get_prompt(&self, id: PromptId) -> Result<Prompt, StorageError> {
        let guard = self.prompts.lock().map_err(poisoned)?;
        guard
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn insert_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        let mut guard = self.prompts.lock().map_err(poisoned)?;
        if guard.iter().any(|p| p.id() == prompt.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(prompt.clone());
        Ok(())
    }

    async fn update_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        let mut guard = self.prompts.lock().map_err(poisoned)?;
        let slot = guard
            .iter_mut()
            .find(|p| p.id() == prompt.id())
            .ok_or(StorageError::NotFound)?;
        *slot = prompt.clone();
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for InMemoryRepository {
    async fn is_admin(&self, user: UserId) -> Result<bool, StorageError> {
        Ok(self.admins.lock().map_err(poisoned)?.contains(&user))
    }

    async fn add_admin(&self, user: UserId) -> Result<(), StorageError> {
        self.admins.lock().map_err(poisoned)?.insert(user);
        Ok(())
    }
}

#[async_trait]
impl ResponseLogRepository for InMemoryRepository {
    async fn append_response(&self, entry: &ResponseLogEntry) -> Result<i64, StorageError> {
        let mut guard = self.responses.lock().map_err(poisoned)?;
        guard.push(entry.clone());
        i64::try_from(guard.len()).map_err(|_| StorageError::Serialization("row id overflow".into()))
    }

    async fn recent_responses(&self, limit: u32) -> Result<Vec<ResponseLogEntry>, StorageError> {
        let guard = self.responses.lock().map_err(poisoned)?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub prompts: Arc<dyn PromptRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub responses: Arc<dyn ResponseLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            prompts: Arc::new(repo.clone()),
            admins: Arc::new(repo.clone()),
            responses: Arc::new(repo),
        }
    }
}
