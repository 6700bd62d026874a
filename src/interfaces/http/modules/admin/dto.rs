//! Moderation/administration DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ModerationNotice;
use crate::interfaces::http::modules::groups::dto::GroupDto;

/// What the external notification collaborator needs to email the creator.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationNoticeDto {
    pub user_name: String,
    pub user_email: String,
    pub group_title: String,
    pub group_subject: String,
    pub status: String,
}

impl From<ModerationNotice> for ModerationNoticeDto {
    fn from(n: ModerationNotice) -> Self {
        Self {
            user_name: n.user_name,
            user_email: n.user_email,
            group_title: n.group_title,
            group_subject: n.group_subject,
            status: n.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationResponse {
    pub group: GroupDto,
    pub notification: ModerationNoticeDto,
}
