//! Database storage implementation using SeaORM
//!
//! Every multi-entity command (`insert_group`, `add_member`,
//! `remove_member`, the delete cascades) runs inside one transaction, so the
//! cross-references between the users and groups tables are updated
//! atomically. SQLite serializes writers, which also covers the
//! capacity-check-and-append step for concurrent joins.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::Value as JsonValue;

use super::entities::{group, user};
use crate::domain::{
    DomainError, DomainResult, Group, GroupStatus, Material, Message, UpdateGroupDto, User,
    UserRole,
};
use crate::infrastructure::storage::Storage;

/// Database storage implementation
pub struct DatabaseStorage {
    db: DatabaseConnection,
}

impl DatabaseStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get database connection reference
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> DomainResult<JsonValue> {
    serde_json::to_value(value).map_err(|e| DomainError::Storage(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: JsonValue) -> DomainResult<T> {
    serde_json::from_value(value).map_err(|e| DomainError::Storage(e.to_string()))
}

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn entity_status_to_domain(status: group::GroupStatus) -> GroupStatus {
    match status {
        group::GroupStatus::Pending => GroupStatus::Pending,
        group::GroupStatus::Approved => GroupStatus::Approved,
        group::GroupStatus::Rejected => GroupStatus::Rejected,
    }
}

fn domain_status_to_entity(status: GroupStatus) -> group::GroupStatus {
    match status {
        GroupStatus::Pending => group::GroupStatus::Pending,
        GroupStatus::Approved => group::GroupStatus::Approved,
        GroupStatus::Rejected => group::GroupStatus::Rejected,
    }
}

fn user_model_to_domain(model: user::Model) -> DomainResult<User> {
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        contact_number: model.contact_number,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_blocked: model.is_blocked,
        terms_accepted: model.terms_accepted,
        joined_groups: from_json(model.joined_groups)?,
        created_groups: from_json(model.created_groups)?,
        created_at: model.created_at,
    })
}

fn user_domain_to_active(u: &User) -> DomainResult<user::ActiveModel> {
    Ok(user::ActiveModel {
        id: Set(u.id.clone()),
        name: Set(u.name.clone()),
        email: Set(u.email.clone()),
        contact_number: Set(u.contact_number.clone()),
        password_hash: Set(u.password_hash.clone()),
        role: Set(domain_role_to_entity(u.role)),
        is_blocked: Set(u.is_blocked),
        terms_accepted: Set(u.terms_accepted),
        joined_groups: Set(to_json(&u.joined_groups)?),
        created_groups: Set(to_json(&u.created_groups)?),
        created_at: Set(u.created_at),
    })
}

fn group_model_to_domain(model: group::Model) -> DomainResult<Group> {
    Ok(Group {
        id: model.id,
        title: model.title,
        subject: model.subject,
        description: model.description,
        image: model.image,
        creator: model.creator,
        members: from_json(model.members)?,
        max_members: model.max_members as u32,
        status: entity_status_to_domain(model.status),
        created_at: model.created_at,
        messages: from_json::<Vec<Message>>(model.messages)?,
        materials: from_json::<Vec<Material>>(model.materials)?,
    })
}

fn group_domain_to_active(g: &Group) -> DomainResult<group::ActiveModel> {
    Ok(group::ActiveModel {
        id: Set(g.id.clone()),
        title: Set(g.title.clone()),
        subject: Set(g.subject.clone()),
        description: Set(g.description.clone()),
        image: Set(g.image.clone()),
        creator: Set(g.creator.clone()),
        members: Set(to_json(&g.members)?),
        max_members: Set(g.max_members as i32),
        status: Set(domain_status_to_entity(g.status)),
        created_at: Set(g.created_at),
        messages: Set(to_json(&g.messages)?),
        materials: Set(to_json(&g.materials)?),
    })
}

// ── Shared lookup/update steps (generic over connection vs. transaction) ──

async fn find_user<C: ConnectionTrait>(conn: &C, id: &str) -> DomainResult<Option<user::Model>> {
    user::Entity::find_by_id(id).one(conn).await.map_err(db_err)
}

async fn find_group<C: ConnectionTrait>(conn: &C, id: &str) -> DomainResult<Option<group::Model>> {
    group::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)
}

/// Rewrite one user's `joined_groups` list with `edit` applied.
async fn edit_joined_groups<C, F>(conn: &C, user_id: &str, edit: F) -> DomainResult<()>
where
    C: ConnectionTrait,
    F: FnOnce(&mut Vec<String>),
{
    let Some(model) = find_user(conn, user_id).await? else {
        // A dangling member reference is not fatal to a cascade.
        return Ok(());
    };
    let mut joined: Vec<String> = from_json(model.joined_groups.clone())?;
    edit(&mut joined);
    let mut active: user::ActiveModel = model.into();
    active.joined_groups = Set(to_json(&joined)?);
    active.update(conn).await.map_err(db_err)?;
    Ok(())
}

async fn edit_created_groups<C, F>(conn: &C, user_id: &str, edit: F) -> DomainResult<()>
where
    C: ConnectionTrait,
    F: FnOnce(&mut Vec<String>),
{
    let Some(model) = find_user(conn, user_id).await? else {
        return Ok(());
    };
    let mut created: Vec<String> = from_json(model.created_groups.clone())?;
    edit(&mut created);
    let mut active: user::ActiveModel = model.into();
    active.created_groups = Set(to_json(&created)?);
    active.update(conn).await.map_err(db_err)?;
    Ok(())
}

/// Unlink a group from every user-side reference, then drop its row.
async fn delete_group_cascade<C: ConnectionTrait>(conn: &C, model: group::Model) -> DomainResult<()> {
    let group = group_model_to_domain(model)?;
    for member_id in &group.members {
        let gid = group.id.clone();
        edit_joined_groups(conn, member_id, move |joined| {
            joined.retain(|g| *g != gid);
        })
        .await?;
    }
    let gid = group.id.clone();
    edit_created_groups(conn, &group.creator, move |created| {
        created.retain(|g| *g != gid);
    })
    .await?;
    group::Entity::delete_by_id(group.id.as_str())
        .exec(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

// ── Storage implementation ──────────────────────────────────────

#[async_trait]
impl Storage for DatabaseStorage {
    async fn insert_user(&self, u: User) -> DomainResult<()> {
        let email = u.email.clone();
        user_domain_to_active(&u)?
            .insert(&self.db)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                    DomainError::Conflict(format!("Email '{}' is already registered", email))
                } else {
                    db_err(e)
                }
            })?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> DomainResult<Option<User>> {
        find_user(&self.db, id).await?.map(user_model_to_domain).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(user_model_to_domain)
            .transpose()
    }

    async fn update_user_profile(&self, u: User) -> DomainResult<()> {
        let Some(model) = find_user(&self.db, &u.id).await? else {
            return Err(DomainError::user_not_found(&u.id));
        };
        let mut active: user::ActiveModel = model.into();
        active.name = Set(u.name);
        active.contact_number = Set(u.contact_number);
        active.is_blocked = Set(u.is_blocked);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list_users(&self, role: Option<UserRole>) -> DomainResult<Vec<User>> {
        let mut query = user::Entity::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }
        query
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(user_model_to_domain)
            .collect()
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(model) = find_user(&txn, id).await? else {
            return Err(DomainError::user_not_found(id));
        };
        let created: Vec<String> = from_json(model.created_groups.clone())?;

        // Created groups go first, each with its full cascade.
        for group_id in &created {
            if let Some(group_model) = find_group(&txn, group_id).await? {
                delete_group_cascade(&txn, group_model).await?;
            }
        }

        // Strip the user from every remaining member list.
        let remaining = group::Entity::find().all(&txn).await.map_err(db_err)?;
        for group_model in remaining {
            let mut members: Vec<String> = from_json(group_model.members.clone())?;
            if members.iter().any(|m| m == id) {
                members.retain(|m| m != id);
                let mut active: group::ActiveModel = group_model.into();
                active.members = Set(to_json(&members)?);
                active.update(&txn).await.map_err(db_err)?;
            }
        }

        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn insert_group(&self, g: Group) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if find_user(&txn, &g.creator).await?.is_none() {
            return Err(DomainError::user_not_found(&g.creator));
        }

        let gid = g.id.clone();
        edit_created_groups(&txn, &g.creator, {
            let gid = gid.clone();
            move |created| {
                if !created.contains(&gid) {
                    created.push(gid);
                }
            }
        })
        .await?;
        edit_joined_groups(&txn, &g.creator, {
            let gid = gid.clone();
            move |joined| {
                if !joined.contains(&gid) {
                    joined.push(gid);
                }
            }
        })
        .await?;

        group_domain_to_active(&g)?.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn get_group(&self, id: &str) -> DomainResult<Option<Group>> {
        find_group(&self.db, id).await?.map(group_model_to_domain).transpose()
    }

    async fn list_groups(&self, status: Option<GroupStatus>) -> DomainResult<Vec<Group>> {
        let mut query = group::Entity::find().order_by_desc(group::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(group::Column::Status.eq(domain_status_to_entity(status)));
        }
        query
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(group_model_to_domain)
            .collect()
    }

    async fn update_group_fields(&self, id: &str, patch: UpdateGroupDto) -> DomainResult<Group> {
        let Some(model) = find_group(&self.db, id).await? else {
            return Err(DomainError::group_not_found(id));
        };
        let mut active: group::ActiveModel = model.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(subject) = patch.subject {
            active.subject = Set(subject);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(image) = patch.image {
            active.image = Set(image);
        }
        if let Some(max_members) = patch.max_members {
            active.max_members = Set(max_members as i32);
        }
        let updated = active.update(&self.db).await.map_err(db_err)?;
        group_model_to_domain(updated)
    }

    async fn delete_group(&self, id: &str) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let Some(model) = find_group(&txn, id).await? else {
            return Err(DomainError::group_not_found(id));
        };
        delete_group_cascade(&txn, model).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn add_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if find_user(&txn, user_id).await?.is_none() {
            return Err(DomainError::user_not_found(user_id));
        }
        let Some(model) = find_group(&txn, group_id).await? else {
            return Err(DomainError::group_not_found(group_id));
        };

        let mut group = group_model_to_domain(model.clone())?;
        group.add_member(user_id)?;

        let mut active: group::ActiveModel = model.into();
        active.members = Set(to_json(&group.members)?);
        active.update(&txn).await.map_err(db_err)?;

        let gid = group_id.to_string();
        edit_joined_groups(&txn, user_id, move |joined| {
            if !joined.contains(&gid) {
                joined.push(gid);
            }
        })
        .await?;

        txn.commit().await.map_err(db_err)?;
        Ok(group)
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> DomainResult<Group> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(model) = find_group(&txn, group_id).await? else {
            return Err(DomainError::group_not_found(group_id));
        };

        let mut group = group_model_to_domain(model.clone())?;
        group.remove_member(user_id)?;

        let mut active: group::ActiveModel = model.into();
        active.members = Set(to_json(&group.members)?);
        active.update(&txn).await.map_err(db_err)?;

        let gid = group_id.to_string();
        edit_joined_groups(&txn, user_id, move |joined| {
            joined.retain(|g| *g != gid);
        })
        .await?;

        txn.commit().await.map_err(db_err)?;
        Ok(group)
    }

    async fn set_group_status(&self, group_id: &str, status: GroupStatus) -> DomainResult<Group> {
        let Some(model) = find_group(&self.db, group_id).await? else {
            return Err(DomainError::group_not_found(group_id));
        };
        let mut active: group::ActiveModel = model.into();
        active.status = Set(domain_status_to_entity(status));
        let updated = active.update(&self.db).await.map_err(db_err)?;
        group_model_to_domain(updated)
    }

    async fn append_message(&self, group_id: &str, message: Message) -> DomainResult<Vec<Message>> {
        let Some(model) = find_group(&self.db, group_id).await? else {
            return Err(DomainError::group_not_found(group_id));
        };
        let mut group = group_model_to_domain(model.clone())?;
        group.post_message(message)?;

        let mut active: group::ActiveModel = model.into();
        active.messages = Set(to_json(&group.messages)?);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(group.messages)
    }

    async fn append_material(
        &self,
        group_id: &str,
        material: Material,
    ) -> DomainResult<Vec<Material>> {
        let Some(model) = find_group(&self.db, group_id).await? else {
            return Err(DomainError::group_not_found(group_id));
        };
        let mut group = group_model_to_domain(model.clone())?;
        group.add_material(material)?;

        let mut active: group::ActiveModel = model.into();
        active.materials = Set(to_json(&group.materials)?);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(group.materials)
    }
}
