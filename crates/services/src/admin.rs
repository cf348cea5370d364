use std::sync::Arc;

use sat_core::Clock;
use sat_core::model::{CurrentUser, Prompt, PromptId, UserId};
use storage::repository::{AdminRepository, PromptRepository};

use crate::error::AdminError;

/// Proof that a user passed [`AdminConsole::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGrant {
    user: UserId,
}

impl AdminGrant {
    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }
}

/// Prompt management for users on the admin allow-list.
#[derive(Clone)]
pub struct AdminConsole {
    clock: Clock,
    prompts: Arc<dyn PromptRepository>,
    admins: Arc<dyn AdminRepository>,
}

impl AdminConsole {
    #[must_use]
    pub fn new(
        clock: Clock,
        prompts: Arc<dyn PromptRepository>,
        admins: Arc<dyn AdminRepository>,
    ) -> Self {
        Self {
            clock,
            prompts,
            admins,
        }
    }

    /// Check the allow-list for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SignInRequired` for anonymous users,
    /// `AdminError::AccessDenied` for users not on the list, and
    /// `AdminError::Storage` if the lookup fails.
    pub async fn authorize(&self, user: CurrentUser) -> Result<AdminGrant, AdminError> {
        let user = user.user_id().ok_or(AdminError::SignInRequired)?;
        if !self.admins.is_admin(user).await? {
            tracing::warn!(%user, "admin access denied");
            return Err(AdminError::AccessDenied);
        }
        Ok(AdminGrant { user })
    }

    /// Add a signed-in user to the allow-list. Enrolling twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::SignInRequired` for anonymous users and
    /// `AdminError::Storage` if the write fails.
    pub async fn enroll(&self, user: CurrentUser) -> Result<AdminGrant, AdminError> {
        let user = user.user_id().ok_or(AdminError::SignInRequired)?;
        self.admins.add_admin(user).await?;
        tracing::info!(%user, "enrolled admin");
        Ok(AdminGrant { user })
    }

    /// All prompts, ordered by category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if prompts cannot be loaded.
    pub async fn list_prompts(&self, _grant: &AdminGrant) -> Result<Vec<Prompt>, AdminError> {
        Ok(self.prompts.list_prompts().await?)
    }

    /// Replace a prompt's content and bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Prompt` for blank content and `AdminError::Storage`
    /// if the prompt is missing or cannot be saved.
    pub async fn edit_prompt(
        &self,
        grant: &AdminGrant,
        id: PromptId,
        content: impl Into<String>,
    ) -> Result<Prompt, AdminError> {
        let mut prompt = self.prompts.get_prompt(id).await?;
        prompt.edit_content(content, self.clock.now())?;
        self.prompts.update_prompt(&prompt).await?;
        tracing::info!(
            prompt = %id,
            category = %prompt.category(),
            admin = %grant.user(),
            "prompt updated"
        );
        Ok(prompt)
    }
}
