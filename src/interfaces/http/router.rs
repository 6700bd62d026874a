//! API router with OpenAPI documentation

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::middleware::{auth_middleware, AuthState};
use super::modules::{admin, auth, groups, health, users};
use crate::application::{
    ContentService, GroupService, MembershipService, ModerationService, UserService,
};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::storage::Storage;

/// Unified state for all routes. Every module shares the same service set.
#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<UserService>,
    pub groups: Arc<GroupService>,
    pub membership: Arc<MembershipService>,
    pub moderation: Arc<ModerationService>,
    pub content: Arc<ContentService>,
}

impl ApiState {
    pub fn new(store: Arc<dyn Storage>, jwt_config: JwtConfig) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&store), jwt_config)),
            groups: Arc::new(GroupService::new(Arc::clone(&store))),
            membership: Arc::new(MembershipService::new(Arc::clone(&store))),
            moderation: Arc::new(ModerationService::new(Arc::clone(&store))),
            content: Arc::new(ContentService::new(store)),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_current_user,
        // Groups
        groups::handlers::list_groups,
        groups::handlers::get_group,
        groups::handlers::create_group,
        groups::handlers::update_group,
        groups::handlers::delete_group,
        groups::handlers::join_group,
        groups::handlers::leave_group,
        groups::handlers::list_messages,
        groups::handlers::post_message,
        groups::handlers::list_materials,
        groups::handlers::add_material,
        // Profile
        users::handlers::get_profile,
        users::handlers::update_profile,
        users::handlers::joined_groups,
        users::handlers::created_groups,
        // Admin
        admin::handlers::list_all_groups,
        admin::handlers::approve_group,
        admin::handlers::reject_group,
        admin::handlers::list_users,
        admin::handlers::block_user,
        admin::handlers::unblock_user,
        admin::handlers::delete_user,
    ),
    components(schemas(
        auth::dto::RegisterRequest,
        auth::dto::LoginRequest,
        auth::dto::LoginResponse,
        auth::dto::UserInfo,
        groups::dto::GroupDto,
        groups::dto::MessageDto,
        groups::dto::MaterialDto,
        groups::dto::CreateGroupRequest,
        groups::dto::UpdateGroupRequest,
        groups::dto::PostMessageRequest,
        groups::dto::AddMaterialRequest,
        users::dto::UserDto,
        users::dto::UpdateProfileRequest,
        admin::dto::ModerationNoticeDto,
        admin::dto::ModerationResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Groups", description = "Study group registry"),
        (name = "Membership", description = "Join and leave groups"),
        (name = "Content", description = "Group messages and materials"),
        (name = "Profile", description = "Own account and group lists"),
        (name = "Admin", description = "Moderation queue and user directory"),
    )
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full API router.
pub fn create_api_router(store: Arc<dyn Storage>, jwt_config: JwtConfig) -> Router {
    let state = ApiState::new(store, jwt_config.clone());
    let auth_state = AuthState { jwt_config };

    // Routes reachable without a token: health, auth, and the public browse
    // surface (approved groups and their content).
    let public = Router::new()
        .route("/health", get(health::handlers::health_check))
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/login", post(auth::handlers::login))
        .route("/groups", get(groups::handlers::list_groups))
        .route("/groups/{id}", get(groups::handlers::get_group))
        .route(
            "/groups/{id}/messages",
            get(groups::handlers::list_messages),
        )
        .route(
            "/groups/{id}/materials",
            get(groups::handlers::list_materials),
        );

    let protected = Router::new()
        .route("/auth/me", get(auth::handlers::get_current_user))
        .route("/groups", post(groups::handlers::create_group))
        .route(
            "/groups/{id}",
            put(groups::handlers::update_group).delete(groups::handlers::delete_group),
        )
        .route("/groups/{id}/join", post(groups::handlers::join_group))
        .route("/groups/{id}/leave", post(groups::handlers::leave_group))
        .route("/groups/{id}/messages", post(groups::handlers::post_message))
        .route(
            "/groups/{id}/materials",
            post(groups::handlers::add_material),
        )
        .route(
            "/profile",
            get(users::handlers::get_profile).put(users::handlers::update_profile),
        )
        .route(
            "/profile/joined-groups",
            get(users::handlers::joined_groups),
        )
        .route(
            "/profile/created-groups",
            get(users::handlers::created_groups),
        )
        .route("/admin/groups", get(admin::handlers::list_all_groups))
        .route(
            "/admin/groups/{id}/approve",
            put(admin::handlers::approve_group),
        )
        .route(
            "/admin/groups/{id}/reject",
            put(admin::handlers::reject_group),
        )
        .route("/admin/users", get(admin::handlers::list_users))
        .route("/admin/users/{id}/block", put(admin::handlers::block_user))
        .route(
            "/admin/users/{id}/unblock",
            put(admin::handlers::unblock_user),
        )
        .route("/admin/users/{id}", delete(admin::handlers::delete_user))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
