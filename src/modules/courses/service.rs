use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::courses::model::{
    Course, CourseDetail, CourseListItem, CreateCourseDto,
};
use crate::utils::errors::AppError;

const COURSE_COLUMNS: &str = "id, educator_id, title, description, price, discount, \
                              is_published, thumbnail_url, content, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)
    }

    pub async fn create(
        db: &PgPool,
        educator_id: &str,
        dto: &CreateCourseDto,
        thumbnail_url: &str,
    ) -> Result<Course, AppError> {
        let content = serde_json::to_value(&dto.content)
            .context("Course content is not serializable")
            .map_err(AppError::database)?;

        sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (educator_id, title, description, price, discount,
                                 is_published, thumbnail_url, content)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(educator_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.discount)
        .bind(dto.is_published)
        .bind(thumbnail_url)
        .bind(content)
        .fetch_one(db)
        .await
        .context("Failed to create course")
        .map_err(AppError::database)
    }

    pub async fn list_by_educator(
        db: &PgPool,
        educator_id: &str,
    ) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE educator_id = $1 ORDER BY created_at DESC"
        ))
        .bind(educator_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch educator courses")
        .map_err(AppError::database)
    }

    /// Published courses for the public catalogue. The content document is
    /// deliberately not selected here.
    pub async fn list_published(db: &PgPool) -> Result<Vec<CourseListItem>, AppError> {
        sqlx::query_as::<_, CourseListItem>(
            r#"
            SELECT c.id, c.educator_id, u.name AS educator_name, c.title, c.description,
                   c.price, c.discount, c.thumbnail_url,
                   COALESCE(AVG(r.rating), 0)::DOUBLE PRECISION AS average_rating,
                   COUNT(DISTINCT e.user_id) AS enrolled_count,
                   c.created_at
            FROM courses c
            JOIN users u ON u.id = c.educator_id
            LEFT JOIN course_ratings r ON r.course_id = c.id
            LEFT JOIN enrollments e ON e.course_id = c.id
            WHERE c.is_published
            GROUP BY c.id, u.name
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch course catalogue")
        .map_err(AppError::database)
    }

    pub async fn get_published_detail(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<CourseDetail>, AppError> {
        sqlx::query_as::<_, CourseDetail>(
            r#"
            SELECT c.id, c.educator_id, u.name AS educator_name, c.title, c.description,
                   c.price, c.discount, c.thumbnail_url, c.content,
                   COALESCE(AVG(r.rating), 0)::DOUBLE PRECISION AS average_rating,
                   COUNT(DISTINCT e.user_id) AS enrolled_count,
                   c.created_at
            FROM courses c
            JOIN users u ON u.id = c.educator_id
            LEFT JOIN course_ratings r ON r.course_id = c.id
            LEFT JOIN enrollments e ON e.course_id = c.id
            WHERE c.id = $1 AND c.is_published
            GROUP BY c.id, u.name
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)
    }
}
