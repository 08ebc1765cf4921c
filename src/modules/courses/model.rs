//! Course data models and DTOs.
//!
//! Course content is a document: an ordered list of chapters, each with
//! its lectures. It is stored as JSONB and only parsed into the typed
//! form where the API needs to validate or redact it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Lecture {
    pub lecture_id: String,
    pub lecture_title: String,
    /// Streaming URL. Blanked in public payloads unless the lecture is a
    /// free preview.
    pub lecture_url: String,
    pub lecture_duration: i64,
    pub is_preview_free: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Chapter {
    pub chapter_id: String,
    pub chapter_title: String,
    pub lectures: Vec<Lecture>,
}

/// A course row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub educator_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Discount percentage, 0..=100.
    pub discount: f64,
    pub is_published: bool,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Vec<Chapter>)]
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalogue entry: course joined with its educator and rating summary,
/// without the content document.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseListItem {
    pub id: Uuid,
    pub educator_id: String,
    pub educator_name: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub thumbnail_url: Option<String>,
    pub average_rating: f64,
    pub enrolled_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Full public view of a single course, content included.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseDetail {
    pub id: Uuid,
    pub educator_id: String,
    pub educator_name: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Vec<Chapter>)]
    pub content: serde_json::Value,
    pub average_rating: f64,
    pub enrolled_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "discount must be between 0 and 100"))]
    pub discount: f64,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub content: Vec<Chapter>,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseListResponse {
    pub success: bool,
    pub courses: Vec<CourseListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub success: bool,
    pub course: CourseDetail,
}

/// Strip streaming URLs from lectures that are not free previews.
/// Unknown document shapes are left untouched.
pub fn redact_paid_lecture_urls(content: &mut serde_json::Value) {
    let Some(chapters) = content.as_array_mut() else {
        return;
    };
    for chapter in chapters {
        let Some(lectures) = chapter.get_mut("lectures").and_then(|l| l.as_array_mut()) else {
            continue;
        };
        for lecture in lectures {
            let free = lecture
                .get("is_preview_free")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !free {
                if let Some(url) = lecture.get_mut("lecture_url") {
                    *url = serde_json::Value::String(String::new());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redaction_blanks_only_paid_lecture_urls() {
        let mut content = json!([
            {
                "chapter_id": "ch1",
                "chapter_title": "Intro",
                "lectures": [
                    {
                        "lecture_id": "l1",
                        "lecture_title": "Welcome",
                        "lecture_url": "https://video.example/l1",
                        "lecture_duration": 300,
                        "is_preview_free": true
                    },
                    {
                        "lecture_id": "l2",
                        "lecture_title": "Deep dive",
                        "lecture_url": "https://video.example/l2",
                        "lecture_duration": 1200,
                        "is_preview_free": false
                    }
                ]
            }
        ]);

        redact_paid_lecture_urls(&mut content);

        let lectures = content[0]["lectures"].as_array().unwrap();
        assert_eq!(lectures[0]["lecture_url"], "https://video.example/l1");
        assert_eq!(lectures[1]["lecture_url"], "");
    }

    #[test]
    fn redaction_ignores_non_array_documents() {
        let mut content = json!({"unexpected": "shape"});
        redact_paid_lecture_urls(&mut content);
        assert_eq!(content, json!({"unexpected": "shape"}));
    }
}
