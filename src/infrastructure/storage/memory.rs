//! In-memory storage implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Storage;
use crate::domain::{
    DomainError, DomainResult, Group, GroupStatus, Material, Message, UpdateGroupDto, User,
    UserRole,
};

#[derive(Default)]
struct StoreState {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
}

/// In-memory storage for development and testing.
///
/// A single `RwLock` over both maps: every multi-entity command runs under
/// one write guard, which is what makes the capacity check-and-append and the
/// delete cascades indivisible. Reads share the lock.
pub struct InMemoryStorage {
    state: RwLock<StoreState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove `group` from every user-side reference. Must run under the write
/// guard that also removes the group record.
fn unlink_group_everywhere(state: &mut StoreState, group: &Group) {
    for member_id in &group.members {
        if let Some(user) = state.users.get_mut(member_id) {
            user.unlink_joined(&group.id);
        }
    }
    if let Some(creator) = state.users.get_mut(&group.creator) {
        creator.unlink_created(&group.id);
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn insert_user(&self, user: User) -> DomainResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
        state.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user_profile(&self, user: User) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let Some(existing) = state.users.get_mut(&user.id) else {
            return Err(DomainError::user_not_found(&user.id));
        };
        existing.name = user.name;
        existing.contact_number = user.contact_number;
        existing.is_blocked = user.is_blocked;
        Ok(())
    }

    async fn list_users(&self, role: Option<UserRole>) -> DomainResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get(id).cloned() else {
            return Err(DomainError::user_not_found(id));
        };

        // Created groups go first, each with its full cascade, so their
        // member links never dangle.
        for group_id in &user.created_groups {
            if let Some(group) = state.groups.remove(group_id) {
                unlink_group_everywhere(&mut state, &group);
            }
        }

        // Strip the user from every remaining member list.
        for group in state.groups.values_mut() {
            group.members.retain(|m| m != id);
        }

        state.users.remove(id);
        Ok(())
    }

    async fn insert_group(&self, group: Group) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let Some(creator) = state.users.get_mut(&group.creator) else {
            return Err(DomainError::user_not_found(&group.creator));
        };
        creator.link_created(&group.id);
        creator.link_joined(&group.id);
        state.groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, id: &str) -> DomainResult<Option<Group>> {
        Ok(self.state.read().await.groups.get(id).cloned())
    }

    async fn list_groups(&self, status: Option<GroupStatus>) -> DomainResult<Vec<Group>> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state
            .groups
            .values()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    async fn update_group_fields(&self, id: &str, patch: UpdateGroupDto) -> DomainResult<Group> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.get_mut(id) else {
            return Err(DomainError::group_not_found(id));
        };
        if let Some(title) = patch.title {
            group.title = title;
        }
        if let Some(subject) = patch.subject {
            group.subject = subject;
        }
        if let Some(description) = patch.description {
            group.description = description;
        }
        if let Some(image) = patch.image {
            group.image = image;
        }
        if let Some(max_members) = patch.max_members {
            group.max_members = max_members;
        }
        Ok(group.clone())
    }

    async fn delete_group(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.remove(id) else {
            return Err(DomainError::group_not_found(id));
        };
        unlink_group_everywhere(&mut state, &group);
        Ok(())
    }

    async fn add_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(user_id) {
            return Err(DomainError::user_not_found(user_id));
        }
        let Some(group) = state.groups.get_mut(group_id) else {
            return Err(DomainError::group_not_found(group_id));
        };
        group.add_member(user_id)?;
        let snapshot = group.clone();
        if let Some(user) = state.users.get_mut(user_id) {
            user.link_joined(group_id);
        }
        Ok(snapshot)
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.get_mut(group_id) else {
            return Err(DomainError::group_not_found(group_id));
        };
        group.remove_member(user_id)?;
        let snapshot = group.clone();
        if let Some(user) = state.users.get_mut(user_id) {
            user.unlink_joined(group_id);
        }
        Ok(snapshot)
    }

    async fn set_group_status(&self, group_id: &str, status: GroupStatus) -> DomainResult<Group> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.get_mut(group_id) else {
            return Err(DomainError::group_not_found(group_id));
        };
        group.set_status(status);
        Ok(group.clone())
    }

    async fn append_message(&self, group_id: &str, message: Message) -> DomainResult<Vec<Message>> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.get_mut(group_id) else {
            return Err(DomainError::group_not_found(group_id));
        };
        group.post_message(message)?;
        Ok(group.messages.clone())
    }

    async fn append_material(
        &self,
        group_id: &str,
        material: Material,
    ) -> DomainResult<Vec<Material>> {
        let mut state = self.state.write().await;
        let Some(group) = state.groups.get_mut(group_id) else {
            return Err(DomainError::group_not_found(group_id));
        };
        group.add_material(material)?;
        Ok(group.materials.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::user::UserRole;

    fn user(name: &str, email: &str) -> User {
        User::new(name, email, "0000000000", "hash", UserRole::User)
    }

    async fn seed_user(store: &InMemoryStorage, name: &str) -> String {
        let u = user(name, &format!("{name}@example.com"));
        let id = u.id.clone();
        store.insert_user(u).await.unwrap();
        id
    }

    async fn seed_approved_group(
        store: &InMemoryStorage,
        creator: &str,
        max_members: u32,
    ) -> String {
        let mut group = Group::new(
            "Algorithms",
            "CS",
            "",
            None,
            creator,
            UserRole::User,
            Some(max_members),
        );
        group.set_status(GroupStatus::Approved);
        let id = group.id.clone();
        store.insert_group(group).await.unwrap();
        id
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStorage::new();
        store.insert_user(user("A", "a@example.com")).await.unwrap();
        let err = store
            .insert_user(user("B", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn insert_group_links_creator_references() {
        let store = InMemoryStorage::new();
        let creator = seed_user(&store, "carol").await;
        let gid = seed_approved_group(&store, &creator, 5).await;

        let user = store.get_user(&creator).await.unwrap().unwrap();
        assert!(user.created_groups.contains(&gid));
        assert!(user.joined_groups.contains(&gid));
    }

    #[tokio::test]
    async fn join_and_leave_keep_both_sides_in_sync() {
        let store = InMemoryStorage::new();
        let creator = seed_user(&store, "carol").await;
        let joiner = seed_user(&store, "dave").await;
        let gid = seed_approved_group(&store, &creator, 5).await;

        let group = store.add_member(&gid, &joiner).await.unwrap();
        assert_eq!(group.members.len(), 2);
        let user = store.get_user(&joiner).await.unwrap().unwrap();
        assert!(user.joined_groups.contains(&gid));

        store.remove_member(&gid, &joiner).await.unwrap();
        let user = store.get_user(&joiner).await.unwrap().unwrap();
        assert!(!user.joined_groups.contains(&gid));
    }

    #[tokio::test]
    async fn failed_join_leaves_no_trace_on_the_user() {
        let store = InMemoryStorage::new();
        let creator = seed_user(&store, "carol").await;
        let joiner = seed_user(&store, "dave").await;
        let mut group = Group::new("G", "S", "", None, creator.as_str(), UserRole::User, Some(5));
        let gid = group.id.clone();
        group.set_status(GroupStatus::Pending);
        store.insert_group(group).await.unwrap();

        let err = store.add_member(&gid, &joiner).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        let user = store.get_user(&joiner).await.unwrap().unwrap();
        assert!(user.joined_groups.is_empty());
    }

    #[tokio::test]
    async fn delete_group_cascade_scrubs_every_reference() {
        let store = InMemoryStorage::new();
        let creator = seed_user(&store, "carol").await;
        let joiner = seed_user(&store, "dave").await;
        let gid = seed_approved_group(&store, &creator, 5).await;
        store.add_member(&gid, &joiner).await.unwrap();
        store
            .append_message(&gid, Message::new(creator.clone(), "hello", None))
            .await
            .unwrap();

        store.delete_group(&gid).await.unwrap();

        assert!(store.get_group(&gid).await.unwrap().is_none());
        let creator = store.get_user(&creator).await.unwrap().unwrap();
        assert!(creator.created_groups.is_empty());
        assert!(creator.joined_groups.is_empty());
        let joiner = store.get_user(&joiner).await.unwrap().unwrap();
        assert!(joiner.joined_groups.is_empty());
    }

    #[tokio::test]
    async fn delete_user_cascade_removes_created_groups_and_memberships() {
        let store = InMemoryStorage::new();
        let carol = seed_user(&store, "carol").await;
        let dave = seed_user(&store, "dave").await;

        // carol creates a group dave joins; dave creates a group carol joins
        let carols_group = seed_approved_group(&store, &carol, 5).await;
        let daves_group = seed_approved_group(&store, &dave, 5).await;
        store.add_member(&carols_group, &dave).await.unwrap();
        store.add_member(&daves_group, &carol).await.unwrap();

        store.delete_user(&carol).await.unwrap();

        assert!(store.get_user(&carol).await.unwrap().is_none());
        // carol's group is gone, and dave no longer references it
        assert!(store.get_group(&carols_group).await.unwrap().is_none());
        let dave_record = store.get_user(&dave).await.unwrap().unwrap();
        assert!(!dave_record.joined_groups.contains(&carols_group));
        // dave's group survives without carol in its member list
        let daves = store.get_group(&daves_group).await.unwrap().unwrap();
        assert!(!daves.is_member(&carol));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_joins_never_oversubscribe() {
        let store = Arc::new(InMemoryStorage::new());
        let creator = seed_user(&store, "carol").await;
        let gid = seed_approved_group(&store, &creator, 5).await;

        let mut joiners = Vec::new();
        for i in 0..20 {
            joiners.push(seed_user(&store, &format!("joiner{i}")).await);
        }

        let mut handles = Vec::new();
        for joiner in joiners {
            let store = Arc::clone(&store);
            let gid = gid.clone();
            handles.push(tokio::spawn(async move {
                store.add_member(&gid, &joiner).await
            }));
        }

        let mut admitted = 0;
        let mut capacity_failures = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(DomainError::CapacityExceeded(..)) => capacity_failures += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        // creator holds one of the five seats
        assert_eq!(admitted, 4);
        assert_eq!(capacity_failures, 16);
        let group = store.get_group(&gid).await.unwrap().unwrap();
        assert_eq!(group.members.len(), 5);
    }
}
