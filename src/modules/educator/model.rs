use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::modules::courses::model::Course;

/// One student enrolled in one of the educator's courses, with the
/// purchase that enrolled them.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrolledStudent {
    pub student_id: String,
    pub student_name: String,
    pub student_image: Option<String>,
    pub course_title: String,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub total_earnings: f64,
    pub total_courses: i64,
    pub total_enrollments: i64,
    pub recent_enrollments: Vec<EnrolledStudent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EducatorCoursesResponse {
    pub success: bool,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledStudentsResponse {
    pub success: bool,
    pub enrolled_students: Vec<EnrolledStudent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseCreatedResponse {
    pub success: bool,
    pub message: String,
    pub course: Course,
}
