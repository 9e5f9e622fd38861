//! Session

use crate::identifiers::UserId;

/// The authenticated user, passed explicitly to operations that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identity provider user id.
    pub user_id: UserId,

    /// Sign-in email address.
    pub email: String,
}

impl Session {
    /// Create a session for a signed-in user.
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Returns true if this session belongs to `user_id`.
    pub fn is_user(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
