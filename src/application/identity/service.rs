//! User directory service — application-layer orchestration
//!
//! Registration, login, profile management, and the admin-only user
//! directory operations (block/unblock, cascading delete).

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Group, Identity, UpdateProfileDto, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::storage::Storage;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service — orchestrates registration, login and directory
/// administration.
pub struct UserService {
    store: Arc<dyn Storage>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(store: Arc<dyn Storage>, jwt_config: JwtConfig) -> Self {
        Self { store, jwt_config }
    }

    // ── Registration & login ────────────────────────────────────

    /// Register a new user account (role: user).
    pub async fn register(&self, dto: CreateUserDto) -> DomainResult<User> {
        if !dto.terms_accepted {
            return Err(DomainError::Validation(
                "Please accept the terms and conditions".into(),
            ));
        }
        if dto.name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }
        if !dto.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if dto.password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }

        if self.store.get_user_by_email(&dto.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Email '{}' is already registered",
                dto.email
            )));
        }

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = User::new(
            dto.name.trim(),
            dto.email,
            dto.contact_number,
            password_hash,
            UserRole::User,
        );
        self.store.insert_user(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    /// Authenticate by email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.store.get_user_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if user.is_blocked {
            warn!(user_id = %user.id, "Blocked user attempted login");
            return Err(DomainError::Unauthorized(
                "Your account has been blocked".into(),
            ));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.name, &user.role.to_string(), &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn profile(&self, user_id: &str) -> DomainResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        dto: UpdateProfileDto,
    ) -> DomainResult<User> {
        let mut user = self.profile(user_id).await?;
        if let Some(name) = dto.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("Name is required".into()));
            }
            user.name = name.trim().to_string();
        }
        if let Some(contact_number) = dto.contact_number {
            user.contact_number = contact_number;
        }
        self.store.update_user_profile(user.clone()).await?;
        Ok(user)
    }

    /// Resolve the groups this user is a member of, in join order.
    pub async fn joined_groups(&self, user_id: &str) -> DomainResult<Vec<Group>> {
        let user = self.profile(user_id).await?;
        self.resolve_groups(&user.joined_groups).await
    }

    /// Resolve the groups this user created, in creation order.
    pub async fn created_groups(&self, user_id: &str) -> DomainResult<Vec<Group>> {
        let user = self.profile(user_id).await?;
        self.resolve_groups(&user.created_groups).await
    }

    async fn resolve_groups(&self, ids: &[String]) -> DomainResult<Vec<Group>> {
        let mut groups = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(group) = self.store.get_group(id).await? {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    // ── Administration ──────────────────────────────────────────

    /// List non-admin accounts. Admin only.
    pub async fn list_users(&self, identity: &Identity) -> DomainResult<Vec<User>> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".into()));
        }
        self.store.list_users(Some(UserRole::User)).await
    }

    /// Set the blocked flag. Membership is untouched; enforcement happens at
    /// login.
    pub async fn block(&self, identity: &Identity, user_id: &str) -> DomainResult<User> {
        self.set_blocked(identity, user_id, true).await
    }

    pub async fn unblock(&self, identity: &Identity, user_id: &str) -> DomainResult<User> {
        self.set_blocked(identity, user_id, false).await
    }

    async fn set_blocked(
        &self,
        identity: &Identity,
        user_id: &str,
        blocked: bool,
    ) -> DomainResult<User> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".into()));
        }
        let mut user = self.profile(user_id).await?;
        user.is_blocked = blocked;
        self.store.update_user_profile(user.clone()).await?;
        info!(user_id, blocked, "User block flag updated");
        Ok(user)
    }

    /// Delete a user and cascade: their created groups are deleted (each a
    /// full group cascade), their remaining memberships are removed, then
    /// the record is dropped. Admin only.
    pub async fn delete_user(&self, identity: &Identity, user_id: &str) -> DomainResult<()> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden("Admin access required".into()));
        }
        self.store.delete_user(user_id).await?;
        info!(user_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryStorage::new()),
            JwtConfig {
                secret: "test-secret".into(),
                expiration_hours: 1,
                issuer: "studygroup-service".into(),
            },
        )
    }

    fn register_dto(email: &str) -> CreateUserDto {
        CreateUserDto {
            name: "Carol".into(),
            email: email.into(),
            contact_number: "0123456789".into(),
            password: "correct horse".into(),
            terms_accepted: true,
        }
    }

    #[tokio::test]
    async fn registration_requires_accepted_terms() {
        let svc = service();
        let mut dto = register_dto("carol@example.com");
        dto.terms_accepted = false;
        let err = svc.register(dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = service();
        svc.register(register_dto("carol@example.com")).await.unwrap();
        let err = svc
            .register(register_dto("carol@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_roundtrip_and_blocked_denial() {
        let svc = service();
        let user = svc.register(register_dto("carol@example.com")).await.unwrap();

        let auth = svc.login("carol@example.com", "correct horse").await.unwrap();
        assert_eq!(auth.user.id, user.id);
        assert!(!auth.token.is_empty());

        let err = svc.login("carol@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let admin = Identity::admin("admin-1");
        svc.block(&admin, &user.id).await.unwrap();
        let err = svc
            .login("carol@example.com", "correct horse")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        svc.unblock(&admin, &user.id).await.unwrap();
        svc.login("carol@example.com", "correct horse").await.unwrap();
    }

    #[tokio::test]
    async fn block_requires_admin() {
        let svc = service();
        let user = svc.register(register_dto("carol@example.com")).await.unwrap();
        let err = svc
            .block(&Identity::user("someone"), &user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_profile_changes_name_and_contact() {
        let svc = service();
        let user = svc.register(register_dto("carol@example.com")).await.unwrap();
        let updated = svc
            .update_profile(
                &user.id,
                UpdateProfileDto {
                    name: Some("Caroline".into()),
                    contact_number: Some("0987654321".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Caroline");
        assert_eq!(updated.contact_number, "0987654321");
    }

    #[tokio::test]
    async fn delete_user_requires_admin_and_removes_record() {
        let svc = service();
        let user = svc.register(register_dto("carol@example.com")).await.unwrap();

        let err = svc
            .delete_user(&Identity::user("someone"), &user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        svc.delete_user(&Identity::admin("admin-1"), &user.id)
            .await
            .unwrap();
        let err = svc.profile(&user.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
