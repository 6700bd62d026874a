//! Caller identity context
//!
//! Every command receives a `{user_id, role}` pair that the transport layer
//! has already authenticated. The core trusts it as-is.

use super::user::UserRole;

/// Authenticated caller context supplied per command.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: UserRole,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(user_id, UserRole::User)
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
