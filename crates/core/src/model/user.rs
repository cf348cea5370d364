use crate::model::ids::UserId;

/// The only thing the core knows about authentication: who is asking, if anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentUser {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl CurrentUser {
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for CurrentUser {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(CurrentUser::Anonymous, CurrentUser::Authenticated)
    }
}
