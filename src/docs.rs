use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admin::model::{PlatformStats, StatsResponse, UpdateRoleRequest, UsersResponse};
use crate::modules::courses::model::{
    Chapter, Course, CourseDetail, CourseDetailResponse, CourseListItem, CourseListResponse,
    CreateCourseDto, Lecture,
};
use crate::modules::educator::model::{
    CourseCreatedResponse, DashboardResponse, EducatorCoursesResponse, EnrolledStudent,
    EnrolledStudentsResponse,
};
use crate::modules::users::model::{
    AddRatingRequest, EnrolledCoursesResponse, GetProgressRequest, MessageResponse,
    ProgressResponse, PurchaseRequest, PurchaseResponse, Role, UpdateProgressRequest, User,
    UserDataResponse,
};
use crate::modules::webhooks::model::WebhookAck;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::get_user_data,
        crate::modules::users::controller::user_enrolled_courses,
        crate::modules::users::controller::purchase_course,
        crate::modules::users::controller::update_user_course_progress,
        crate::modules::users::controller::get_user_course_progress,
        crate::modules::users::controller::add_user_rating,
        crate::modules::users::controller::health,
        crate::modules::educator::controller::request_educator_role,
        crate::modules::educator::controller::add_course,
        crate::modules::educator::controller::get_educator_courses,
        crate::modules::educator::controller::educator_dashboard,
        crate::modules::educator::controller::get_enrolled_students,
        crate::modules::educator::controller::health,
        crate::modules::courses::controller::get_all_courses,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::admin::controller::get_users,
        crate::modules::admin::controller::get_stats,
        crate::modules::admin::controller::update_user_role,
        crate::modules::webhooks::controller::clerk_webhooks,
        crate::modules::webhooks::controller::stripe_webhooks,
    ),
    components(
        schemas(
            User,
            Role,
            PurchaseRequest,
            UpdateProgressRequest,
            GetProgressRequest,
            AddRatingRequest,
            UserDataResponse,
            EnrolledCoursesResponse,
            PurchaseResponse,
            ProgressResponse,
            MessageResponse,
            Course,
            Chapter,
            Lecture,
            CreateCourseDto,
            CourseListItem,
            CourseDetail,
            CourseListResponse,
            CourseDetailResponse,
            EnrolledStudent,
            DashboardResponse,
            EducatorCoursesResponse,
            EnrolledStudentsResponse,
            CourseCreatedResponse,
            UsersResponse,
            PlatformStats,
            StatsResponse,
            UpdateRoleRequest,
            WebhookAck,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "User", description = "Profile, enrollment, purchases and progress"),
        (name = "Educator", description = "Course publishing and earnings"),
        (name = "Courses", description = "Public course catalogue"),
        (name = "Admin", description = "Platform administration"),
        (name = "Webhooks", description = "Signed callbacks from external services")
    )
)]
pub struct ApiDoc;

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
                        .build(),
                ),
            );
        }
    }
}
