use axum::{Json, extract::State, http::header};
use axum::http::HeaderMap;
use chrono::Utc;
use tracing::instrument;

use crate::middleware::auth::CurrentIdentity;
use crate::modules::courses::service::CourseService;
use crate::modules::users::model::{
    AddRatingRequest, EnrolledCoursesResponse, GetProgressRequest, MessageResponse,
    ProgressResponse, PurchaseRequest, PurchaseResponse, UpdateProgressRequest, UserDataResponse,
};
use crate::modules::users::service::{ProgressService, PurchaseService, RatingService, UserService};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Get the calling user's profile
#[utoipa::path(
    get,
    path = "/api/user/data",
    responses(
        (status = 200, description = "User profile", body = UserDataResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state))]
pub async fn get_user_data(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<UserDataResponse>, AppError> {
    let user = UserService::get(&state.db, &identity.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserDataResponse {
        success: true,
        user,
    }))
}

/// List the courses the calling user is enrolled in
#[utoipa::path(
    get,
    path = "/api/user/enrolled-courses",
    responses(
        (status = 200, description = "Enrolled courses", body = EnrolledCoursesResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state))]
pub async fn user_enrolled_courses(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<EnrolledCoursesResponse>, AppError> {
    let courses = UserService::enrolled_courses(&state.db, &identity.id).await?;

    Ok(Json(EnrolledCoursesResponse {
        success: true,
        courses,
    }))
}

/// Start a checkout session for one course
#[utoipa::path(
    post,
    path = "/api/user/purchase",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Checkout session created", body = PurchaseResponse),
        (status = 400, description = "Course unavailable or already enrolled", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Course not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state, headers))]
pub async fn purchase_course(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let course = CourseService::get(&state.db, body.course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    if !course.is_published {
        return Err(AppError::bad_request("Course is not available"));
    }
    if UserService::is_enrolled(&state.db, course.id, &identity.id).await? {
        return Err(AppError::bad_request("Already enrolled in this course"));
    }

    let amount = discounted_price(course.price, course.discount);
    let purchase =
        PurchaseService::create_pending(&state.db, course.id, &identity.id, amount).await?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| state.config.cors.allowed_origins.first().cloned())
        .unwrap_or_else(|| "http://localhost:5173".to_string());

    let session = state
        .payments
        .create_checkout_session(purchase.id, &course.title, amount, &origin)
        .await
        .map_err(|error| {
            tracing::error!(error = ?error, purchase_id = %purchase.id, "checkout session failed");
            AppError::internal("Payment service error")
        })?;

    Ok(Json(PurchaseResponse {
        success: true,
        session_url: session.url,
    }))
}

/// Mark a lecture completed
#[utoipa::path(
    post,
    path = "/api/user/update-course-progress",
    request_body = UpdateProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = ProgressResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state))]
pub async fn update_user_course_progress(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    ValidatedJson(body): ValidatedJson<UpdateProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    let progress =
        ProgressService::record_lecture(&state.db, &identity.id, body.course_id, &body.lecture_id)
            .await?;

    Ok(Json(ProgressResponse {
        success: true,
        completed_lectures: progress.completed_lectures,
    }))
}

/// Get lecture completion for one course
#[utoipa::path(
    post,
    path = "/api/user/get-course-progress",
    request_body = GetProgressRequest,
    responses(
        (status = 200, description = "Current progress", body = ProgressResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state))]
pub async fn get_user_course_progress(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    ValidatedJson(body): ValidatedJson<GetProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    let completed_lectures = ProgressService::get(&state.db, &identity.id, body.course_id)
        .await?
        .map(|p| p.completed_lectures)
        .unwrap_or_default();

    Ok(Json(ProgressResponse {
        success: true,
        completed_lectures,
    }))
}

/// Rate an enrolled course
#[utoipa::path(
    post,
    path = "/api/user/add-rating",
    request_body = AddRatingRequest,
    responses(
        (status = 200, description = "Rating saved", body = MessageResponse),
        (status = 400, description = "Not enrolled in the course", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
#[instrument(skip(state))]
pub async fn add_user_rating(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    ValidatedJson(body): ValidatedJson<AddRatingRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if !UserService::is_enrolled(&state.db, body.course_id, &identity.id).await? {
        return Err(AppError::bad_request(
            "You must be enrolled to rate this course",
        ));
    }

    RatingService::upsert(&state.db, body.course_id, &identity.id, body.rating).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Rating saved".to_string(),
    }))
}

/// Liveness check for the user routes
#[utoipa::path(
    get,
    path = "/api/user/health",
    responses((status = 200, description = "User routes are up", body = MessageResponse)),
    tag = "User"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "User routes are working",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn discounted_price(price: f64, discount: f64) -> f64 {
    let amount = price - price * discount / 100.0;
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_is_applied_as_a_percentage() {
        assert_eq!(discounted_price(100.0, 25.0), 75.0);
        assert_eq!(discounted_price(49.99, 0.0), 49.99);
        assert_eq!(discounted_price(10.0, 100.0), 0.0);
    }

    #[test]
    fn discounted_price_rounds_to_cents() {
        assert_eq!(discounted_price(19.99, 33.0), 13.39);
    }
}
