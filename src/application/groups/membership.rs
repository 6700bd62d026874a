//! Membership coordinator
//!
//! Join/leave transitions and the bidirectional consistency between
//! `Group.members` and `User.joined_groups`. The heavy lifting happens in
//! the store's atomic commands; this service adds logging and keeps the
//! transport layer away from the storage trait.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainResult, Group, Identity};
use crate::infrastructure::storage::Storage;

pub struct MembershipService {
    store: Arc<dyn Storage>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Join an approved group. Deliberately not idempotent: a repeated join
    /// reports `Conflict` so client bugs surface instead of being swallowed.
    pub async fn join(&self, identity: &Identity, group_id: &str) -> DomainResult<Group> {
        let group = self.store.add_member(group_id, &identity.user_id).await?;
        info!(
            group_id,
            user_id = %identity.user_id,
            members = group.members.len(),
            "User joined group"
        );
        Ok(group)
    }

    /// Leave a group. Creators cannot leave; they delete the group instead.
    pub async fn leave(&self, identity: &Identity, group_id: &str) -> DomainResult<Group> {
        let group = self.store.remove_member(group_id, &identity.user_id).await?;
        info!(group_id, user_id = %identity.user_id, "User left group");
        Ok(group)
    }
}
