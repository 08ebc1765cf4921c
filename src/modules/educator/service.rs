use anyhow::Context;
use sqlx::PgPool;

use crate::modules::educator::model::EnrolledStudent;
use crate::utils::errors::AppError;

pub struct EducatorService;

/// Aggregate dashboard numbers for one educator.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct DashboardTotals {
    pub total_earnings: f64,
    pub total_courses: i64,
    pub total_enrollments: i64,
}

impl EducatorService {
    pub async fn dashboard_totals(
        db: &PgPool,
        educator_id: &str,
    ) -> Result<DashboardTotals, AppError> {
        sqlx::query_as::<_, DashboardTotals>(
            r#"
            SELECT
                COALESCE((
                    SELECT SUM(p.amount)
                    FROM purchases p
                    JOIN courses c ON c.id = p.course_id
                    WHERE c.educator_id = $1 AND p.status = 'completed'
                ), 0)::DOUBLE PRECISION AS total_earnings,
                (SELECT COUNT(*) FROM courses WHERE educator_id = $1) AS total_courses,
                (
                    SELECT COUNT(*)
                    FROM enrollments e
                    JOIN courses c ON c.id = e.course_id
                    WHERE c.educator_id = $1
                ) AS total_enrollments
            "#,
        )
        .bind(educator_id)
        .fetch_one(db)
        .await
        .context("Failed to compute dashboard totals")
        .map_err(AppError::database)
    }

    /// Students who completed a purchase on one of the educator's courses,
    /// newest first.
    pub async fn enrolled_students(
        db: &PgPool,
        educator_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<EnrolledStudent>, AppError> {
        sqlx::query_as::<_, EnrolledStudent>(
            r#"
            SELECT u.id AS student_id, u.name AS student_name, u.image_url AS student_image,
                   c.title AS course_title, p.updated_at AS purchase_date
            FROM purchases p
            JOIN courses c ON c.id = p.course_id
            JOIN users u ON u.id = p.user_id
            WHERE c.educator_id = $1 AND p.status = 'completed'
            ORDER BY p.updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(educator_id)
        .bind(limit.unwrap_or(i64::MAX))
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled students")
        .map_err(AppError::database)
    }
}
