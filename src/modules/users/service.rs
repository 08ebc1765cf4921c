use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::modules::courses::model::Course;
use crate::modules::users::model::{CourseProgress, Purchase, Role, User};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id, name, email, image_url, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    pub async fn get(db: &PgPool, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user")
            .map_err(AppError::database)
    }

    /// Insert or refresh the local mirror of a provider user record.
    pub async fn upsert<'e>(
        db: impl PgExecutor<'e>,
        id: &str,
        name: &str,
        email: &str,
        image_url: Option<&str>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url,
                updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(image_url)
        .fetch_one(db)
        .await
        .context("Failed to upsert user")
        .map_err(AppError::database)
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;
        Ok(())
    }

    pub async fn set_role<'e>(
        db: impl PgExecutor<'e>,
        id: &str,
        role: Role,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET role = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(db)
            .await
            .context("Failed to update user role")
            .map_err(AppError::database)?;
        Ok(())
    }

    pub async fn enrolled_courses(db: &PgPool, user_id: &str) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT c.id, c.educator_id, c.title, c.description, c.price, c.discount,
                   c.is_published, c.thumbnail_url, c.content, c.created_at, c.updated_at
            FROM courses c
            JOIN enrollments e ON e.course_id = c.id
            WHERE e.user_id = $1
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled courses")
        .map_err(AppError::database)
    }

    pub async fn is_enrolled(
        db: &PgPool,
        course_id: Uuid,
        user_id: &str,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to check enrollment")
        .map_err(AppError::database)
    }
}

pub struct ProgressService;

impl ProgressService {
    pub async fn get(
        db: &PgPool,
        user_id: &str,
        course_id: Uuid,
    ) -> Result<Option<CourseProgress>, AppError> {
        sqlx::query_as::<_, CourseProgress>(
            r#"
            SELECT user_id, course_id, completed_lectures, updated_at
            FROM course_progress
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course progress")
        .map_err(AppError::database)
    }

    /// Mark one lecture completed. Recording the same lecture twice keeps
    /// a single entry.
    pub async fn record_lecture(
        db: &PgPool,
        user_id: &str,
        course_id: Uuid,
        lecture_id: &str,
    ) -> Result<CourseProgress, AppError> {
        sqlx::query_as::<_, CourseProgress>(
            r#"
            INSERT INTO course_progress (user_id, course_id, completed_lectures)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, course_id) DO UPDATE
            SET completed_lectures = (
                    SELECT array_agg(DISTINCT lecture)
                    FROM unnest(course_progress.completed_lectures || EXCLUDED.completed_lectures)
                        AS lecture
                ),
                updated_at = now()
            RETURNING user_id, course_id, completed_lectures, updated_at
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(vec![lecture_id.to_string()])
        .fetch_one(db)
        .await
        .context("Failed to record course progress")
        .map_err(AppError::database)
    }
}

pub struct RatingService;

impl RatingService {
    pub async fn upsert(
        db: &PgPool,
        course_id: Uuid,
        user_id: &str,
        rating: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO course_ratings (course_id, user_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, user_id) DO UPDATE
            SET rating = EXCLUDED.rating, updated_at = now()
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .bind(rating)
        .execute(db)
        .await
        .context("Failed to save rating")
        .map_err(AppError::database)?;
        Ok(())
    }
}

const PURCHASE_COLUMNS: &str = "id, course_id, user_id, amount, status, created_at, updated_at";

pub struct PurchaseService;

impl PurchaseService {
    pub async fn create_pending(
        db: &PgPool,
        course_id: Uuid,
        user_id: &str,
        amount: f64,
    ) -> Result<Purchase, AppError> {
        sqlx::query_as::<_, Purchase>(&format!(
            r#"
            INSERT INTO purchases (course_id, user_id, amount)
            VALUES ($1, $2, $3)
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(course_id)
        .bind(user_id)
        .bind(amount)
        .fetch_one(db)
        .await
        .context("Failed to create purchase")
        .map_err(AppError::database)
    }

    /// Move a purchase to a terminal status, returning the updated row if
    /// it exists.
    pub async fn set_status<'e>(
        db: impl PgExecutor<'e>,
        purchase_id: Uuid,
        status: &str,
    ) -> Result<Option<Purchase>, AppError> {
        sqlx::query_as::<_, Purchase>(&format!(
            r#"
            UPDATE purchases
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(purchase_id)
        .bind(status)
        .fetch_optional(db)
        .await
        .context("Failed to update purchase")
        .map_err(AppError::database)
    }

    pub async fn enroll<'e>(
        db: impl PgExecutor<'e>,
        course_id: Uuid,
        user_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (course_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (course_id, user_id) DO NOTHING
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("Failed to enroll user")
        .map_err(AppError::database)?;
        Ok(())
    }
}
