//! Group domain entity and its embedded content ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::user::UserRole;

/// Default seat bound when the creator does not pick one
pub const DEFAULT_MAX_MEMBERS: u32 = 50;

/// Seat bound limits enforced at create/update time
pub const MIN_MAX_MEMBERS: u32 = 2;
pub const MAX_MAX_MEMBERS: u32 = 50;

const DEFAULT_IMAGE: &str = "https://via.placeholder.com/300x200?text=Study+Group";

/// Moderation status controlling visibility and joinability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for GroupStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl From<&str> for GroupStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

/// Chat message inside a group. Append-only; removed only when the group is
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Sending user; must be a member at post time
    pub sender: String,
    pub text: String,
    /// Opaque reference to an uploaded attachment
    pub file_url: Option<String>,
    pub ts: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>, file_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender: sender.into(),
            text: text.into(),
            file_url,
            ts: Utc::now(),
        }
    }
}

/// Shared study material inside a group. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub title: String,
    /// Opaque URL/path; the core does not validate storage location
    pub url: String,
    pub uploaded_by: String,
    pub ts: DateTime<Utc>,
}

impl Material {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            url: url.into(),
            uploaded_by: uploaded_by.into(),
            ts: Utc::now(),
        }
    }
}

/// Data handed to the external notification collaborator after a moderation
/// decision. The core only produces it, it never sends anything.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationNotice {
    pub user_name: String,
    pub user_email: String,
    pub group_title: String,
    pub group_subject: String,
    pub status: GroupStatus,
}

/// Group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: String,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub image: String,
    /// Creating user; always present in `members` until deletion
    pub creator: String,
    /// Member user ids in join order
    pub members: Vec<String>,
    /// Seat bound; `members.len() <= max_members` at all times
    pub max_members: u32,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub materials: Vec<Material>,
}

impl Group {
    /// Create a group for `creator`. Admin-created groups skip the moderation
    /// queue and start approved.
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        image: Option<String>,
        creator: impl Into<String>,
        creator_role: UserRole,
        max_members: Option<u32>,
    ) -> Self {
        let creator = creator.into();
        let status = if creator_role == UserRole::Admin {
            GroupStatus::Approved
        } else {
            GroupStatus::Pending
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            subject: subject.into(),
            description: description.into(),
            image: image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            members: vec![creator.clone()],
            creator,
            max_members: max_members.unwrap_or(DEFAULT_MAX_MEMBERS),
            status,
            created_at: Utc::now(),
            messages: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator == user_id
    }

    /// Admit a user. Checks status, duplicates and capacity in that order;
    /// callers must invoke this inside the store's exclusive section so the
    /// capacity check and the append are one indivisible step.
    pub fn add_member(&mut self, user_id: &str) -> DomainResult<()> {
        if self.status != GroupStatus::Approved {
            return Err(DomainError::InvalidState(format!(
                "Group '{}' is not approved yet",
                self.title
            )));
        }
        if self.is_member(user_id) {
            return Err(DomainError::Conflict(
                "Already a member of this group".to_string(),
            ));
        }
        if self.members.len() >= self.max_members as usize {
            return Err(DomainError::CapacityExceeded(
                self.members.len(),
                self.max_members,
            ));
        }
        self.members.push(user_id.to_string());
        Ok(())
    }

    /// Drop a member. The creator can never leave; they delete the group
    /// instead.
    pub fn remove_member(&mut self, user_id: &str) -> DomainResult<()> {
        if !self.is_member(user_id) {
            return Err(DomainError::Conflict(
                "Not a member of this group".to_string(),
            ));
        }
        if self.is_creator(user_id) {
            return Err(DomainError::Forbidden(
                "Group creator cannot leave the group. Delete the group instead.".to_string(),
            ));
        }
        self.members.retain(|m| m != user_id);
        Ok(())
    }

    /// Append a message. Membership is the only gate; moderation status does
    /// not restrict posting.
    pub fn post_message(&mut self, message: Message) -> DomainResult<()> {
        if !self.is_member(&message.sender) {
            return Err(DomainError::Forbidden(
                "You must be a member to post messages".to_string(),
            ));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Append a shared material. Same gate as messages.
    pub fn add_material(&mut self, material: Material) -> DomainResult<()> {
        if !self.is_member(&material.uploaded_by) {
            return Err(DomainError::Forbidden(
                "You must be a member to add materials".to_string(),
            ));
        }
        self.materials.push(material);
        Ok(())
    }

    /// Overwrite the moderation status. Transitions are unconditional; a
    /// rejected group may be re-approved.
    pub fn set_status(&mut self, status: GroupStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved_group(creator: &str, max_members: u32) -> Group {
        let mut group = Group::new(
            "Rust study circle",
            "Systems programming",
            "Weekly deep dives",
            None,
            creator,
            UserRole::User,
            Some(max_members),
        );
        group.set_status(GroupStatus::Approved);
        group
    }

    #[test]
    fn creator_is_seeded_as_member() {
        let group = approved_group("u1", 10);
        assert!(group.is_member("u1"));
        assert_eq!(group.members, vec!["u1".to_string()]);
    }

    #[test]
    fn admin_created_groups_start_approved() {
        let group = Group::new("G", "S", "", None, "a1", UserRole::Admin, None);
        assert_eq!(group.status, GroupStatus::Approved);

        let group = Group::new("G", "S", "", None, "u1", UserRole::User, None);
        assert_eq!(group.status, GroupStatus::Pending);
        assert_eq!(group.max_members, DEFAULT_MAX_MEMBERS);
    }

    #[test]
    fn join_requires_approved_status() {
        let mut group = Group::new("G", "S", "", None, "u1", UserRole::User, Some(5));
        let err = group.add_member("u2").unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(group.members.len(), 1);

        group.set_status(GroupStatus::Rejected);
        let err = group.add_member("u2").unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn duplicate_join_is_a_conflict() {
        let mut group = approved_group("u1", 5);
        group.add_member("u2").unwrap();
        let err = group.add_member("u2").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn capacity_is_bounded() {
        let mut group = approved_group("u1", 3);
        group.add_member("u2").unwrap();
        group.add_member("u3").unwrap();
        let err = group.add_member("u4").unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded(3, 3)));
        assert_eq!(group.members.len(), 3);
    }

    #[test]
    fn creator_cannot_leave() {
        let mut group = approved_group("u1", 5);
        let err = group.remove_member("u1").unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert!(group.is_member("u1"));
    }

    #[test]
    fn leave_requires_membership() {
        let mut group = approved_group("u1", 5);
        let err = group.remove_member("u9").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        group.add_member("u2").unwrap();
        group.remove_member("u2").unwrap();
        assert!(!group.is_member("u2"));
    }

    #[test]
    fn posting_is_gated_on_membership_not_status() {
        let mut group = Group::new("G", "S", "", None, "u1", UserRole::User, Some(5));
        // still pending: the creator can post
        group
            .post_message(Message::new("u1", "kickoff at 5pm", None))
            .unwrap();
        let err = group
            .post_message(Message::new("u2", "can I come?", None))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(group.messages.len(), 1);
    }

    #[test]
    fn materials_are_gated_on_membership() {
        let mut group = approved_group("u1", 5);
        group
            .add_material(Material::new("Syllabus", "/uploads/syllabus.pdf", "u1"))
            .unwrap();
        let err = group
            .add_material(Material::new("Notes", "/uploads/notes.pdf", "u2"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(group.materials.len(), 1);
    }

    #[test]
    fn rejected_group_can_be_reapproved() {
        let mut group = Group::new("G", "S", "", None, "u1", UserRole::User, None);
        group.set_status(GroupStatus::Rejected);
        group.set_status(GroupStatus::Approved);
        assert_eq!(group.status, GroupStatus::Approved);
    }
}
