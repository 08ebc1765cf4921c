use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::{Role, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

/// Platform-wide totals for the admin overview.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow, ToSchema)]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_educators: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: PlatformStats,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}
