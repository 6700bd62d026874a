//! Moderation workflow
//!
//! Admin-only status transitions. Each decision returns the updated group
//! plus a `ModerationNotice` payload for the external notification
//! collaborator; nothing is sent from here.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, Group, GroupStatus, Identity, ModerationNotice};
use crate::infrastructure::storage::Storage;

pub struct ModerationService {
    store: Arc<dyn Storage>,
}

impl ModerationService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    pub async fn approve(
        &self,
        identity: &Identity,
        group_id: &str,
    ) -> DomainResult<(Group, ModerationNotice)> {
        self.decide(identity, group_id, GroupStatus::Approved).await
    }

    pub async fn reject(
        &self,
        identity: &Identity,
        group_id: &str,
    ) -> DomainResult<(Group, ModerationNotice)> {
        self.decide(identity, group_id, GroupStatus::Rejected).await
    }

    async fn decide(
        &self,
        identity: &Identity,
        group_id: &str,
        status: GroupStatus,
    ) -> DomainResult<(Group, ModerationNotice)> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".into()));
        }

        // The status write is unconditional, so a rejected group can be
        // re-approved after resubmission.
        let group = self.store.set_group_status(group_id, status).await?;

        let creator = self
            .store
            .get_user(&group.creator)
            .await?
            .ok_or_else(|| DomainError::user_not_found(&group.creator))?;

        let notice = ModerationNotice {
            user_name: creator.name,
            user_email: creator.email,
            group_title: group.title.clone(),
            group_subject: group.subject.clone(),
            status,
        };

        info!(group_id, status = %status, "Moderation decision recorded");
        Ok((group, notice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::groups::GroupService;
    use crate::domain::{CreateGroupDto, User, UserRole};
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

    async fn seed_pending_group(store: &Arc<dyn Storage>, creator: &Identity) -> Group {
        GroupService::new(Arc::clone(store))
            .create_group(
                creator,
                CreateGroupDto {
                    title: "Microeconomics".into(),
                    subject: "Economics".into(),
                    description: String::new(),
                    image: None,
                    max_members: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn moderation_requires_admin() {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let svc = ModerationService::new(Arc::clone(&store));
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let group = seed_pending_group(&store, &carol).await;

        let err = svc.approve(&carol, &group.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = svc.reject(&carol, &group.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn moderating_a_missing_group_is_not_found() {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let svc = ModerationService::new(Arc::clone(&store));
        let admin = seed_user(&store, "root", UserRole::Admin).await;

        let err = svc.approve(&admin, "missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn approval_produces_a_notice_for_the_creator() {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let svc = ModerationService::new(Arc::clone(&store));
        let admin = seed_user(&store, "root", UserRole::Admin).await;
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let group = seed_pending_group(&store, &carol).await;

        let (approved, notice) = svc.approve(&admin, &group.id).await.unwrap();
        assert_eq!(approved.status, GroupStatus::Approved);
        assert_eq!(notice.user_email, "carol@example.com");
        assert_eq!(notice.group_title, "Microeconomics");
        assert_eq!(notice.status, GroupStatus::Approved);
    }

    #[tokio::test]
    async fn rejected_groups_can_be_reapproved() {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let svc = ModerationService::new(Arc::clone(&store));
        let admin = seed_user(&store, "root", UserRole::Admin).await;
        let carol = seed_user(&store, "carol", UserRole::User).await;
        let group = seed_pending_group(&store, &carol).await;

        let (rejected, notice) = svc.reject(&admin, &group.id).await.unwrap();
        assert_eq!(rejected.status, GroupStatus::Rejected);
        assert_eq!(notice.status, GroupStatus::Rejected);

        let (approved, _) = svc.approve(&admin, &group.id).await.unwrap();
        assert_eq!(approved.status, GroupStatus::Approved);
    }
}
