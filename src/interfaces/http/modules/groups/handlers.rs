//! Group API handlers
//!
//! Browse/get are public; every mutation requires an authenticated caller.
//! Delegates to the group, membership and content services.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use super::dto::{
    AddMaterialRequest, CreateGroupRequest, GroupDto, MaterialDto, MessageDto, PostMessageRequest,
    UpdateGroupRequest,
};
use crate::domain::{CreateGroupDto, UpdateGroupDto};
use crate::interfaces::http::common::{error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::router::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tag = "Groups",
    responses(
        (status = 200, description = "Approved groups, most recent first", body = ApiResponse<Vec<GroupDto>>)
    )
)]
pub async fn list_groups(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<Vec<GroupDto>>>, (StatusCode, Json<ApiResponse<Vec<GroupDto>>>)> {
    match state.groups.list_approved_groups().await {
        Ok(groups) => Ok(Json(ApiResponse::success(
            groups.into_iter().map(GroupDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = ApiResponse<GroupDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_group(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GroupDto>>, (StatusCode, Json<ApiResponse<GroupDto>>)> {
    match state.groups.get_group(&id).await {
        Ok(group) => Ok(Json(ApiResponse::success(GroupDto::from(group)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/groups",
    tag = "Groups",
    security(("bearer_auth" = [])),
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created (pending unless created by an admin)", body = ApiResponse<GroupDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupDto>>), (StatusCode, Json<ApiResponse<GroupDto>>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ));
    }

    let dto = CreateGroupDto {
        title: request.title,
        subject: request.subject,
        description: request.description,
        image: request.image,
        max_members: request.max_members,
    };

    match state.groups.create_group(&user.identity(), dto).await {
        Ok(group) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(GroupDto::from(group))),
        )),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = ApiResponse<GroupDto>),
        (status = 403, description = "Not the creator or an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<ApiResponse<GroupDto>>, (StatusCode, Json<ApiResponse<GroupDto>>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ));
    }

    let patch = UpdateGroupDto {
        title: request.title,
        subject: request.subject,
        description: request.description,
        image: request.image,
        max_members: request.max_members,
    };

    match state.groups.update_group(&user.identity(), &id, patch).await {
        Ok(group) => Ok(Json(ApiResponse::success(GroupDto::from(group)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted with all cross-references"),
        (status = 403, description = "Not the creator or an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.groups.delete_group(&user.identity(), &id).await {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/join",
    tag = "Membership",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Joined", body = ApiResponse<GroupDto>),
        (status = 400, description = "Not approved or group is full"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already a member")
    )
)]
pub async fn join_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GroupDto>>, (StatusCode, Json<ApiResponse<GroupDto>>)> {
    match state.membership.join(&user.identity(), &id).await {
        Ok(group) => Ok(Json(ApiResponse::success(GroupDto::from(group)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/leave",
    tag = "Membership",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Left", body = ApiResponse<GroupDto>),
        (status = 403, description = "Creators cannot leave"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Not a member")
    )
)]
pub async fn leave_group(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GroupDto>>, (StatusCode, Json<ApiResponse<GroupDto>>)> {
    match state.membership.leave(&user.identity(), &id).await {
        Ok(group) => Ok(Json(ApiResponse::success(GroupDto::from(group)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/messages",
    tag = "Content",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Messages in posting order", body = ApiResponse<Vec<MessageDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_messages(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>, (StatusCode, Json<ApiResponse<Vec<MessageDto>>>)> {
    match state.content.list_messages(&id).await {
        Ok(messages) => Ok(Json(ApiResponse::success(
            messages.into_iter().map(MessageDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/messages",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    request_body = PostMessageRequest,
    responses(
        (status = 200, description = "Updated message ledger", body = ApiResponse<Vec<MessageDto>>),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Not found")
    )
)]
pub async fn post_message(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>, (StatusCode, Json<ApiResponse<Vec<MessageDto>>>)> {
    match state
        .content
        .post_message(&user.identity(), &id, &request.text, request.file_url)
        .await
    {
        Ok(messages) => Ok(Json(ApiResponse::success(
            messages.into_iter().map(MessageDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/materials",
    tag = "Content",
    params(("id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Materials in upload order", body = ApiResponse<Vec<MaterialDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_materials(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MaterialDto>>>, (StatusCode, Json<ApiResponse<Vec<MaterialDto>>>)>
{
    match state.content.list_materials(&id).await {
        Ok(materials) => Ok(Json(ApiResponse::success(
            materials.into_iter().map(MaterialDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/materials",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Group ID")),
    request_body = AddMaterialRequest,
    responses(
        (status = 200, description = "Updated material ledger", body = ApiResponse<Vec<MaterialDto>>),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Not found")
    )
)]
pub async fn add_material(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<AddMaterialRequest>,
) -> Result<Json<ApiResponse<Vec<MaterialDto>>>, (StatusCode, Json<ApiResponse<Vec<MaterialDto>>>)>
{
    match state
        .content
        .add_material(&user.identity(), &id, &request.title, &request.url)
        .await
    {
        Ok(materials) => Ok(Json(ApiResponse::success(
            materials.into_iter().map(MaterialDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}
