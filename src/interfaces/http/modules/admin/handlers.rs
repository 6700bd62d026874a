//! Administration API handlers
//!
//! Moderation queue and user directory management. The admin check itself
//! lives in the services; these handlers only translate results.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ModerationNoticeDto, ModerationResponse};
use crate::interfaces::http::common::{error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::groups::dto::GroupDto;
use crate::interfaces::http::modules::users::dto::UserDto;
use crate::interfaces::http::router::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/groups",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All groups regardless of status", body = ApiResponse<Vec<GroupDto>>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_all_groups(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<GroupDto>>>, (StatusCode, Json<ApiResponse<Vec<GroupDto>>>)> {
    match state.groups.list_all_groups(&user.identity()).await {
        Ok(groups) => Ok(Json(ApiResponse::success(
            groups.into_iter().map(GroupDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/groups/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Approved; includes notification payload", body = ApiResponse<ModerationResponse>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn approve_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ModerationResponse>>, (StatusCode, Json<ApiResponse<ModerationResponse>>)>
{
    match state.moderation.approve(&user.identity(), &id).await {
        Ok((group, notice)) => Ok(Json(ApiResponse::success(ModerationResponse {
            group: GroupDto::from(group),
            notification: ModerationNoticeDto::from(notice),
        }))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/groups/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Rejected; includes notification payload", body = ApiResponse<ModerationResponse>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn reject_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ModerationResponse>>, (StatusCode, Json<ApiResponse<ModerationResponse>>)>
{
    match state.moderation.reject(&user.identity(), &id).await {
        Ok((group, notice)) => Ok(Json(ApiResponse::success(ModerationResponse {
            group: GroupDto::from(group),
            notification: ModerationNoticeDto::from(notice),
        }))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Non-admin accounts", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<Vec<UserDto>>>)> {
    match state.users.list_users(&user.identity()).await {
        Ok(users) => Ok(Json(ApiResponse::success(
            users.into_iter().map(UserDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/block",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User blocked", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn block_user(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    match state.users.block(&user.identity(), &id).await {
        Ok(blocked) => Ok(Json(ApiResponse::success(UserDto::from(blocked)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/unblock",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unblocked", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn unblock_user(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    match state.users.unblock(&user.identity(), &id).await {
        Ok(unblocked) => Ok(Json(ApiResponse::success(UserDto::from(unblocked)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted with full cascade"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.users.delete_user(&user.identity(), &id).await {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err(error_response(e)),
    }
}
