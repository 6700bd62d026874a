//! Storage trait definitions

use async_trait::async_trait;

use crate::domain::{
    DomainResult, Group, GroupStatus, Material, Message, UpdateGroupDto, User, UserRole,
};

/// Storage trait for persistence operations.
///
/// Commands that touch cross-referenced entities (`insert_group`,
/// `add_member`, `remove_member`, the two cascades) are atomic: either every
/// side effect is visible to readers or none is. Capacity checks happen
/// inside the same exclusive section as the member append, so concurrent
/// joins can never oversubscribe a group.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    /// Fails with `Conflict` when the email is already taken.
    async fn insert_user(&self, user: User) -> DomainResult<()>;
    async fn get_user(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    /// Overwrites profile-level fields (name, contact, blocked flag). The
    /// cross-reference vectors are owned by the atomic commands below and are
    /// not touched here.
    async fn update_user_profile(&self, user: User) -> DomainResult<()>;
    async fn list_users(&self, role: Option<UserRole>) -> DomainResult<Vec<User>>;
    /// Cascade: deletes every group the user created (each a full group
    /// cascade), strips the user from remaining member lists, then drops the
    /// user record.
    async fn delete_user(&self, id: &str) -> DomainResult<()>;

    // Group operations
    /// Persists the group and links it into the creator's `created_groups`
    /// and `joined_groups` in the same atomic step.
    async fn insert_group(&self, group: Group) -> DomainResult<()>;
    async fn get_group(&self, id: &str) -> DomainResult<Option<Group>>;
    /// Most recent first. `status = None` lists everything (admin view).
    async fn list_groups(&self, status: Option<GroupStatus>) -> DomainResult<Vec<Group>>;
    /// Applies a partial metadata update without disturbing members or the
    /// content ledger.
    async fn update_group_fields(&self, id: &str, patch: UpdateGroupDto) -> DomainResult<Group>;
    /// Cascade: unlinks the group from every member's `joined_groups` and the
    /// creator's `created_groups`, drops embedded messages/materials with the
    /// record.
    async fn delete_group(&self, id: &str) -> DomainResult<()>;

    // Atomic cross-reference commands
    /// Capacity-safe conditional append: validates status, duplicate
    /// membership and capacity, then updates both `Group.members` and
    /// `User.joined_groups` as one step.
    async fn add_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group>;
    /// Symmetric removal; rejects the creator.
    async fn remove_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group>;
    async fn set_group_status(&self, group_id: &str, status: GroupStatus) -> DomainResult<Group>;
    /// Membership-gated append; returns the full ordered ledger.
    async fn append_message(&self, group_id: &str, message: Message) -> DomainResult<Vec<Message>>;
    async fn append_material(
        &self,
        group_id: &str,
        material: Material,
    ) -> DomainResult<Vec<Material>>;
}
