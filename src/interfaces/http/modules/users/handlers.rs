//! User profile API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use super::dto::{UpdateProfileRequest, UserDto};
use crate::domain::UpdateProfileDto;
use crate::interfaces::http::common::{error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::groups::dto::GroupDto;
use crate::interfaces::http::router::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    match state.users.profile(&user.user_id).await {
        Ok(profile) => Ok(Json(ApiResponse::success(UserDto::from(profile)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ));
    }

    let dto = UpdateProfileDto {
        name: request.name,
        contact_number: request.contact_number,
    };

    match state.users.update_profile(&user.user_id, dto).await {
        Ok(profile) => Ok(Json(ApiResponse::success(UserDto::from(profile)))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/joined-groups",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Groups the caller is a member of", body = ApiResponse<Vec<GroupDto>>)
    )
)]
pub async fn joined_groups(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<GroupDto>>>, (StatusCode, Json<ApiResponse<Vec<GroupDto>>>)> {
    match state.users.joined_groups(&user.user_id).await {
        Ok(groups) => Ok(Json(ApiResponse::success(
            groups.into_iter().map(GroupDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/created-groups",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Groups the caller created", body = ApiResponse<Vec<GroupDto>>)
    )
)]
pub async fn created_groups(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<GroupDto>>>, (StatusCode, Json<ApiResponse<Vec<GroupDto>>>)> {
    match state.users.created_groups(&user.user_id).await {
        Ok(groups) => Ok(Json(ApiResponse::success(
            groups.into_iter().map(GroupDto::from).collect(),
        ))),
        Err(e) => Err(error_response(e)),
    }
}
