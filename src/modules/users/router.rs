use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::require_authenticated;
use crate::modules::users::controller::{
    add_user_rating, get_user_course_progress, get_user_data, health, purchase_course,
    update_user_course_progress, user_enrolled_courses,
};
use crate::state::AppState;

pub fn init_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/data", get(get_user_data))
        .route("/enrolled-courses", get(user_enrolled_courses))
        .route("/purchase", post(purchase_course))
        .route("/update-course-progress", post(update_user_course_progress))
        .route("/get-course-progress", post(get_user_course_progress))
        .route("/add-rating", post(add_user_rating))
        .route_layer(middleware::from_fn_with_state(state, require_authenticated))
        // Unauthenticated liveness probe, registered after the gate layer
        .route("/health", get(health))
}
