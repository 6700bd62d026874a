//! Group registry service

use std::sync::Arc;

use tracing::info;

use crate::domain::group::model::{MAX_MAX_MEMBERS, MIN_MAX_MEMBERS};
use crate::domain::{
    CreateGroupDto, DomainError, DomainResult, Group, GroupStatus, Identity, UpdateGroupDto,
};
use crate::infrastructure::storage::Storage;

fn validate_max_members(max_members: u32) -> DomainResult<()> {
    if !(MIN_MAX_MEMBERS..=MAX_MAX_MEMBERS).contains(&max_members) {
        return Err(DomainError::Validation(format!(
            "maxMembers must be between {} and {}",
            MIN_MAX_MEMBERS, MAX_MAX_MEMBERS
        )));
    }
    Ok(())
}

/// Group registry — owns group CRUD and the authority rules around it.
pub struct GroupService {
    store: Arc<dyn Storage>,
}

impl GroupService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Create a group. Groups created by an admin are approved immediately;
    /// everyone else's wait in the moderation queue.
    pub async fn create_group(
        &self,
        identity: &Identity,
        dto: CreateGroupDto,
    ) -> DomainResult<Group> {
        if dto.title.trim().is_empty() || dto.subject.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and subject are required".into(),
            ));
        }
        if let Some(max_members) = dto.max_members {
            validate_max_members(max_members)?;
        }

        let group = Group::new(
            dto.title.trim(),
            dto.subject.trim(),
            dto.description,
            dto.image,
            identity.user_id.as_str(),
            identity.role,
            dto.max_members,
        );
        self.store.insert_group(group.clone()).await?;

        info!(
            group_id = %group.id,
            creator = %group.creator,
            status = %group.status,
            "Group created"
        );
        Ok(group)
    }

    pub async fn get_group(&self, id: &str) -> DomainResult<Group> {
        self.store
            .get_group(id)
            .await?
            .ok_or_else(|| DomainError::group_not_found(id))
    }

    /// Public browse view: approved groups, most recent first.
    pub async fn list_approved_groups(&self) -> DomainResult<Vec<Group>> {
        self.store.list_groups(Some(GroupStatus::Approved)).await
    }

    /// Admin view: every group regardless of status, most recent first.
    pub async fn list_all_groups(&self, identity: &Identity) -> DomainResult<Vec<Group>> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".into()));
        }
        self.store.list_groups(None).await
    }

    /// Partial metadata update by the creator or an admin.
    pub async fn update_group(
        &self,
        identity: &Identity,
        id: &str,
        patch: UpdateGroupDto,
    ) -> DomainResult<Group> {
        let group = self.get_group(id).await?;
        if !group.is_creator(&identity.user_id) && !identity.is_admin() {
            return Err(DomainError::Forbidden(
                "Only group creator or admin can edit this group".into(),
            ));
        }
        if let Some(max_members) = patch.max_members {
            validate_max_members(max_members)?;
        }
        self.store.update_group_fields(id, patch).await
    }

    /// Delete a group and cascade all cross-references. Creator or admin.
    pub async fn delete_group(&self, identity: &Identity, id: &str) -> DomainResult<()> {
        let group = self.get_group(id).await?;
        if !group.is_creator(&identity.user_id) && !identity.is_admin() {
            return Err(DomainError::Forbidden(
                "Only group creator or admin can delete this group".into(),
            ));
        }
        self.store.delete_group(id).await?;
        info!(group_id = id, requester = %identity.user_id, "Group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserRole};
    use crate::infrastructure::storage::InMemoryStorage;

    async fn seed_user(store: &Arc<dyn Storage>, name: &str, role: UserRole) -> Identity {
        let user = User::new(
            name,
            format!("{name}@example.com"),
            "0000000000",
            "hash",
            role,
        );
        let identity = Identity::new(user.id.clone(), role);
        store.insert_user(user).await.unwrap();
        identity
    }

    fn dto() -> CreateGroupDto {
        CreateGroupDto {
            title: "Linear Algebra".into(),
            subject: "Math".into(),
            description: "Midterm prep".into(),
            image: None,
            max_members: Some(10),
        }
    }

    fn setup() -> (Arc<dyn Storage>, GroupService) {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let service = GroupService::new(Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn user_created_groups_await_approval() {
        let (store, svc) = setup();
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let group = svc.create_group(&carol, dto()).await.unwrap();
        assert_eq!(group.status, GroupStatus::Pending);
        assert!(group.is_member(&carol.user_id));
    }

    #[tokio::test]
    async fn admin_created_groups_are_auto_approved() {
        let (store, svc) = setup();
        let admin = seed_user(&store, "root", UserRole::Admin).await;
        let group = svc.create_group(&admin, dto()).await.unwrap();
        assert_eq!(group.status, GroupStatus::Approved);
    }

    #[tokio::test]
    async fn create_validates_required_fields_and_bounds() {
        let (store, svc) = setup();
        let carol = seed_user(&store, "carol", UserRole::User).await;

        let mut bad = dto();
        bad.title = "  ".into();
        let err = svc.create_group(&carol, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut bad = dto();
        bad.max_members = Some(1);
        let err = svc.create_group(&carol, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut bad = dto();
        bad.max_members = Some(51);
        let err = svc.create_group(&carol, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn browse_lists_only_approved_groups() {
        let (store, svc) = setup();
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let admin = seed_user(&store, "root", UserRole::Admin).await;

        let pending = svc.create_group(&carol, dto()).await.unwrap();
        let approved = svc.create_group(&admin, dto()).await.unwrap();

        let listed = svc.list_approved_groups().await.unwrap();
        assert!(listed.iter().any(|g| g.id == approved.id));
        assert!(!listed.iter().any(|g| g.id == pending.id));

        // admin view sees both
        let all = svc.list_all_groups(&admin).await.unwrap();
        assert_eq!(all.len(), 2);
        let err = svc.list_all_groups(&carol).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_is_restricted_to_creator_or_admin() {
        let (store, svc) = setup();
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let dave = seed_user(&store, "dave", UserRole::User).await;
        let admin = seed_user(&store, "root", UserRole::Admin).await;
        let group = svc.create_group(&carol, dto()).await.unwrap();

        let patch = UpdateGroupDto {
            title: Some("Linear Algebra II".into()),
            ..Default::default()
        };

        let err = svc
            .update_group(&dave, &group.id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let updated = svc.update_group(&carol, &group.id, patch).await.unwrap();
        assert_eq!(updated.title, "Linear Algebra II");

        let updated = svc
            .update_group(
                &admin,
                &group.id,
                UpdateGroupDto {
                    subject: Some("Mathematics".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.subject, "Mathematics");
    }

    #[tokio::test]
    async fn delete_is_restricted_and_cascades() {
        let (store, svc) = setup();
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let dave = seed_user(&store, "dave", UserRole::User).await;
        let group = svc.create_group(&carol, dto()).await.unwrap();

        let err = svc.delete_group(&dave, &group.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        svc.delete_group(&carol, &group.id).await.unwrap();
        let err = svc.get_group(&group.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let creator = store.get_user(&carol.user_id).await.unwrap().unwrap();
        assert!(creator.created_groups.is_empty());
        assert!(creator.joined_groups.is_empty());
    }

    #[tokio::test]
    async fn missing_group_is_not_found() {
        let (_store, svc) = setup();
        let err = svc.get_group("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
