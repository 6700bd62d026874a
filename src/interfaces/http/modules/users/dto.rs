//! User profile DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;

/// Full profile view. The password hash never leaves the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub role: String,
    pub is_blocked: bool,
    pub terms_accepted: bool,
    pub joined_groups: Vec<String>,
    pub created_groups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            contact_number: user.contact_number,
            role: user.role.to_string(),
            is_blocked: user.is_blocked,
            terms_accepted: user.terms_accepted,
            joined_groups: user.joined_groups,
            created_groups: user.created_groups,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub contact_number: Option<String>,
}
