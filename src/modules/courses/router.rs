use axum::{Router, routing::get};

use crate::modules::courses::controller::{get_all_courses, get_course_by_id};
use crate::state::AppState;

pub fn init_course_router() -> Router<AppState> {
    Router::new()
        .route("/all", get(get_all_courses))
        .route("/{id}", get(get_course_by_id))
}
