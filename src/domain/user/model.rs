//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// User entity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, unique across all users
    pub email: String,
    /// Contact phone number
    pub contact_number: String,
    /// Bcrypt hash; opaque to the domain
    pub password_hash: String,
    pub role: UserRole,
    /// Blocked users are denied login but keep their memberships
    pub is_blocked: bool,
    /// Registration requires accepting the terms
    pub terms_accepted: bool,
    /// Groups this user is a member of (includes groups they created)
    pub joined_groups: Vec<String>,
    /// Groups this user created
    pub created_groups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        contact_number: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            contact_number: contact_number.into(),
            password_hash: password_hash.into(),
            role,
            is_blocked: false,
            terms_accepted: true,
            joined_groups: Vec::new(),
            created_groups: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Record membership of a group. Keeps insertion order, ignores repeats.
    pub fn link_joined(&mut self, group_id: &str) {
        if !self.joined_groups.iter().any(|g| g == group_id) {
            self.joined_groups.push(group_id.to_string());
        }
    }

    pub fn unlink_joined(&mut self, group_id: &str) {
        self.joined_groups.retain(|g| g != group_id);
    }

    pub fn link_created(&mut self, group_id: &str) {
        if !self.created_groups.iter().any(|g| g == group_id) {
            self.created_groups.push(group_id.to_string());
        }
    }

    pub fn unlink_created(&mut self, group_id: &str) {
        self.created_groups.retain(|g| g != group_id);
    }
}
