use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::{
    CourseDetailResponse, CourseListResponse, redact_paid_lecture_urls,
};
use crate::modules::courses::service::CourseService;
use crate::modules::users::model::MessageResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Public course catalogue
#[utoipa::path(
    get,
    path = "/api/course/all",
    responses((status = 200, description = "Published courses", body = CourseListResponse)),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_all_courses(
    State(state): State<AppState>,
) -> Result<Json<CourseListResponse>, AppError> {
    let courses = CourseService::list_published(&state.db).await?;

    Ok(Json(CourseListResponse {
        success: true,
        courses,
    }))
}

/// Public view of a single course
#[utoipa::path(
    get,
    path = "/api/course/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailResponse),
        (status = 404, description = "Course not found", body = MessageResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>, AppError> {
    let mut course = CourseService::get_published_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    // Paid lecture streams are only served to enrolled users
    redact_paid_lecture_urls(&mut course.content);

    Ok(Json(CourseDetailResponse {
        success: true,
        course,
    }))
}
