//! Content ledger
//!
//! Append-only messages and shared materials scoped to one group. Membership
//! is the only gate; the moderation status does not restrict posting.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Identity, Material, Message};
use crate::infrastructure::storage::Storage;

pub struct ContentService {
    store: Arc<dyn Storage>,
}

impl ContentService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Post a message. Returns the full ledger in posting order (ascending
    /// timestamps).
    pub async fn post_message(
        &self,
        identity: &Identity,
        group_id: &str,
        text: &str,
        file_url: Option<String>,
    ) -> DomainResult<Vec<Message>> {
        if text.trim().is_empty() && file_url.is_none() {
            return Err(DomainError::Validation("Message text is required".into()));
        }
        let message = Message::new(identity.user_id.as_str(), text.trim(), file_url);
        self.store.append_message(group_id, message).await
    }

    /// Share a material. Returns the full ledger in upload order.
    pub async fn add_material(
        &self,
        identity: &Identity,
        group_id: &str,
        title: &str,
        url: &str,
    ) -> DomainResult<Vec<Material>> {
        if title.trim().is_empty() || url.trim().is_empty() {
            return Err(DomainError::Validation(
                "Material title and url are required".into(),
            ));
        }
        let material = Material::new(title.trim(), url.trim(), identity.user_id.as_str());
        self.store.append_material(group_id, material).await
    }

    pub async fn list_messages(&self, group_id: &str) -> DomainResult<Vec<Message>> {
        let group = self
            .store
            .get_group(group_id)
            .await?
            .ok_or_else(|| DomainError::group_not_found(group_id))?;
        Ok(group.messages)
    }

    pub async fn list_materials(&self, group_id: &str) -> DomainResult<Vec<Material>> {
        let group = self
            .store
            .get_group(group_id)
            .await?
            .ok_or_else(|| DomainError::group_not_found(group_id))?;
        Ok(group.materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::groups::{GroupService, MembershipService};
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

    struct Fixture {
        store: Arc<dyn Storage>,
        content: ContentService,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        Fixture {
            content: ContentService::new(Arc::clone(&store)),
            store,
        }
    }

    async fn seed_group(f: &Fixture, creator: &Identity) -> String {
        GroupService::new(Arc::clone(&f.store))
            .create_group(
                creator,
                CreateGroupDto {
                    title: "World History".into(),
                    subject: "History".into(),
                    description: String::new(),
                    image: None,
                    max_members: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn non_members_cannot_post() {
        let f = fixture();
        let carol = seed_user(&f.store, "carol", UserRole::User).await;
        let dave = seed_user(&f.store, "dave", UserRole::User).await;
        let gid = seed_group(&f, &carol).await;

        let err = f
            .content
            .post_message(&dave, &gid, "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f
            .content
            .add_material(&dave, &gid, "Notes", "/uploads/notes.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn messages_keep_posting_order() {
        let f = fixture();
        let admin = seed_user(&f.store, "root", UserRole::Admin).await;
        let dave = seed_user(&f.store, "dave", UserRole::User).await;
        let gid = seed_group(&f, &admin).await;
        MembershipService::new(Arc::clone(&f.store))
            .join(&dave, &gid)
            .await
            .unwrap();

        f.content
            .post_message(&admin, &gid, "first", None)
            .await
            .unwrap();
        let messages = f
            .content
            .post_message(&dave, &gid, "second", None)
            .await
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].text, "second");
        assert!(messages[0].ts <= messages[1].ts);
    }

    #[tokio::test]
    async fn empty_message_without_attachment_is_invalid() {
        let f = fixture();
        let carol = seed_user(&f.store, "carol", UserRole::User).await;
        let gid = seed_group(&f, &carol).await;

        let err = f
            .content
            .post_message(&carol, &gid, "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // attachment-only messages are fine
        let messages = f
            .content
            .post_message(&carol, &gid, "", Some("/uploads/scan.png".into()))
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].file_url.as_deref(), Some("/uploads/scan.png"));
    }

    #[tokio::test]
    async fn materials_record_the_uploader() {
        let f = fixture();
        let carol = seed_user(&f.store, "carol", UserRole::User).await;
        let gid = seed_group(&f, &carol).await;

        let materials = f
            .content
            .add_material(&carol, &gid, "Syllabus", "/uploads/syllabus.pdf")
            .await
            .unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].uploaded_by, carol.user_id);

        let listed = f.content.list_materials(&gid).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn ledger_queries_fail_on_missing_group() {
        let f = fixture();
        let err = f.content.list_messages("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
