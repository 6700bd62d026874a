//! Group DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Group, Material, Message};

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageDto {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub file_url: Option<String>,
    pub ts: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender: m.sender,
            text: m.text,
            file_url: m.file_url,
            ts: m.ts,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialDto {
    pub id: String,
    pub title: String,
    pub url: String,
    pub uploaded_by: String,
    pub ts: DateTime<Utc>,
}

impl From<Material> for MaterialDto {
    fn from(m: Material) -> Self {
        Self {
            id: m.id,
            title: m.title,
            url: m.url,
            uploaded_by: m.uploaded_by,
            ts: m.ts,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDto {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub description: String,
    pub image: String,
    pub creator: String,
    pub members: Vec<String>,
    pub max_members: u32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageDto>,
    pub materials: Vec<MaterialDto>,
}

impl From<Group> for GroupDto {
    fn from(g: Group) -> Self {
        Self {
            id: g.id,
            title: g.title,
            subject: g.subject,
            description: g.description,
            image: g.image,
            creator: g.creator,
            members: g.members,
            max_members: g.max_members,
            status: g.status.to_string(),
            created_at: g.created_at,
            messages: g.messages.into_iter().map(MessageDto::from).collect(),
            materials: g.materials.into_iter().map(MaterialDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    #[validate(range(min = 2, max = 50))]
    pub max_members: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 2, max = 50))]
    pub max_members: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub text: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMaterialRequest {
    pub title: String,
    pub url: String,
}
