use axum::{Json, extract::Multipart, extract::State};
use chrono::Utc;
use tracing::instrument;
use validator::Validate;

use crate::middleware::auth::CurrentIdentity;
use crate::modules::courses::model::CreateCourseDto;
use crate::modules::courses::service::CourseService;
use crate::modules::educator::model::{
    CourseCreatedResponse, DashboardResponse, EducatorCoursesResponse, EnrolledStudentsResponse,
};
use crate::modules::educator::service::EducatorService;
use crate::modules::users::model::{MessageResponse, Role};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::format_errors;

/// Request the educator role for the calling user
#[utoipa::path(
    post,
    path = "/api/educator/request-role",
    responses(
        (status = 200, description = "Role granted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educator"
)]
#[instrument(skip(state))]
pub async fn request_educator_role(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .update_role(&identity.id, Role::Educator)
        .await
        .map_err(|error| {
            tracing::error!(error = ?error, user_id = %identity.id, "role update failed");
            AppError::internal("Authentication service error")
        })?;

    // Keep the local mirror in step; the provider webhook will confirm it.
    UserService::set_role(&state.db, &identity.id, Role::Educator).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Educator role granted. You can now publish courses".to_string(),
    }))
}

/// Publish a new course with its thumbnail
#[utoipa::path(
    post,
    path = "/api/educator/add-course",
    responses(
        (status = 200, description = "Course created", body = CourseCreatedResponse),
        (status = 400, description = "Malformed form or missing thumbnail", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Educator role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educator"
)]
#[instrument(skip(state, multipart))]
pub async fn add_course(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    mut multipart: Multipart,
) -> Result<Json<CourseCreatedResponse>, AppError> {
    let mut dto: Option<CreateCourseDto> = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart form"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("course_data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid multipart form"))?;
                let parsed: CreateCourseDto = serde_json::from_str(&text)
                    .map_err(|_| AppError::bad_request("course_data is not valid JSON"))?;
                parsed
                    .validate()
                    .map_err(|errors| AppError::unprocessable(format_errors(&errors)))?;
                dto = Some(parsed);
            }
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid multipart form"))?;
                image = Some((content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let dto = dto.ok_or_else(|| AppError::bad_request("course_data is required"))?;
    let (content_type, bytes) =
        image.ok_or_else(|| AppError::bad_request("Thumbnail image is required"))?;

    let thumbnail_url = state
        .media
        .upload_image(&content_type, &bytes)
        .await
        .map_err(|error| {
            tracing::error!(error = ?error, "thumbnail upload failed");
            AppError::internal("Media service error")
        })?;

    let course = CourseService::create(&state.db, &identity.id, &dto, &thumbnail_url).await?;

    Ok(Json(CourseCreatedResponse {
        success: true,
        message: "Course added".to_string(),
        course,
    }))
}

/// List the calling educator's courses
#[utoipa::path(
    get,
    path = "/api/educator/courses",
    responses(
        (status = 200, description = "Educator courses", body = EducatorCoursesResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Educator role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educator"
)]
#[instrument(skip(state))]
pub async fn get_educator_courses(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<EducatorCoursesResponse>, AppError> {
    let courses = CourseService::list_by_educator(&state.db, &identity.id).await?;

    Ok(Json(EducatorCoursesResponse {
        success: true,
        courses,
    }))
}

/// Earnings and enrollment summary for the calling educator
#[utoipa::path(
    get,
    path = "/api/educator/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Educator role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educator"
)]
#[instrument(skip(state))]
pub async fn educator_dashboard(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<DashboardResponse>, AppError> {
    let totals = EducatorService::dashboard_totals(&state.db, &identity.id).await?;
    let recent_enrollments =
        EducatorService::enrolled_students(&state.db, &identity.id, Some(10)).await?;

    Ok(Json(DashboardResponse {
        success: true,
        total_earnings: totals.total_earnings,
        total_courses: totals.total_courses,
        total_enrollments: totals.total_enrollments,
        recent_enrollments,
    }))
}

/// All students enrolled in the calling educator's courses
#[utoipa::path(
    get,
    path = "/api/educator/enrolled-students",
    responses(
        (status = 200, description = "Enrolled students", body = EnrolledStudentsResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "Educator role required", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Educator"
)]
#[instrument(skip(state))]
pub async fn get_enrolled_students(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<EnrolledStudentsResponse>, AppError> {
    let enrolled_students =
        EducatorService::enrolled_students(&state.db, &identity.id, None).await?;

    Ok(Json(EnrolledStudentsResponse {
        success: true,
        enrolled_students,
    }))
}

/// Liveness check for the educator routes
#[utoipa::path(
    get,
    path = "/api/educator/health",
    responses((status = 200, description = "Educator routes are up", body = MessageResponse)),
    tag = "Educator"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Educator routes are working",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
