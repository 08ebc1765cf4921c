use anyhow::Context;
use sqlx::PgPool;

use crate::modules::admin::model::PlatformStats;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;

pub struct AdminService;

impl AdminService {
    pub async fn list_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, image_url, role, created_at, updated_at \
             FROM users ORDER BY created_at DESC",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)
    }

    pub async fn platform_stats(db: &PgPool) -> Result<PlatformStats, AppError> {
        sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE role = 'educator') AS total_educators,
                (SELECT COUNT(*) FROM courses) AS total_courses,
                (SELECT COUNT(*) FROM enrollments) AS total_enrollments,
                COALESCE((SELECT SUM(amount) FROM purchases WHERE status = 'completed'), 0)
                    ::DOUBLE PRECISION AS total_revenue
            "#,
        )
        .fetch_one(db)
        .await
        .context("Failed to compute platform stats")
        .map_err(AppError::database)
    }
}
