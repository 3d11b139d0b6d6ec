use crate::error::{Error, Result};
use crate::models::User;

/// Who is making a request.
///
/// Operations take an `Option<&Identity>`: `None` means no identity was supplied at all,
/// `Some(Identity::Anonymous)` means the caller is known to be unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { id: i32, username: String },
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User { .. })
    }

    pub fn user_id(&self) -> Option<i32> {
        match self {
            Identity::User { id, .. } => Some(*id),
            Identity::Anonymous => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::User { username, .. } => Some(username),
            Identity::Anonymous => None,
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity::User {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Resolve the authenticated user behind a request, or fail with `Unauthenticated`.
pub(crate) fn require_user(identity: Option<&Identity>) -> Result<(i32, &str)> {
    match identity {
        Some(Identity::User { id, username }) => Ok((*id, username.as_str())),
        _ => Err(Error::Unauthenticated),
    }
}
