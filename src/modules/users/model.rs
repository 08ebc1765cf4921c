//! User data models and DTOs.
//!
//! The canonical identity lives in the external auth provider; the local
//! `users` table is a mirror kept current by the provider's webhooks and
//! by role changes made through this API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The closed set of roles an identity can carry.
///
/// The provider stores the claim as a free-form string; it is parsed into
/// this enum exactly once, at the role gate, so every downstream role
/// comparison is an exhaustive match instead of a string check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Educator,
    Admin,
}

/// Raised when the provider reports a role claim outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role claim {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Educator => "educator",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "educator" => Some(Role::Educator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Interpret the provider's optional claim. An absent claim is an
    /// ordinary user; an unrecognized value is an explicit rejection.
    pub fn from_claim(claim: Option<&str>) -> Result<Self, UnknownRole> {
        match claim {
            None => Ok(Role::User),
            Some(value) => Role::parse(value).ok_or_else(|| UnknownRole(value.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local mirror of a provider user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    /// Provider-issued id, not a local surrogate key.
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PurchaseRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProgressRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, message = "lecture_id must not be empty"))]
    pub lecture_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GetProgressRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddRatingRequest {
    pub course_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
}

/// A purchase of one course by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Purchase {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: String,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-course lecture completion for one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseProgress {
    pub user_id: String,
    pub course_id: Uuid,
    pub completed_lectures: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDataResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCoursesResponse {
    pub success: bool,
    pub courses: Vec<crate::modules::courses::model::Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub success: bool,
    pub session_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub success: bool,
    pub completed_lectures: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
