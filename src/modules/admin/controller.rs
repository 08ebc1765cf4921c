use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::modules::admin::model::{StatsResponse, UpdateRoleRequest, UsersResponse};
use crate::modules::admin::service::AdminService;
use crate::modules::users::model::MessageResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// List every user known to the platform
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = AdminService::list_users(&state.db).await?;

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// Platform-wide totals
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Platform stats", body = StatsResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = AdminService::platform_stats(&state.db).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// Override a user's role
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(("id" = String, Path, description = "Provider user id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Admin role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .update_role(&user_id, body.role)
        .await
        .map_err(|error| {
            tracing::error!(error = ?error, user_id = %user_id, "role update failed");
            AppError::internal("Authentication service error")
        })?;

    UserService::set_role(&state.db, &user_id, body.role).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: format!("Role updated to {}", body.role),
    }))
}
