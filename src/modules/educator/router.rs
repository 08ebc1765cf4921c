use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::{require_authenticated, require_educator};
use crate::modules::educator::controller::{
    add_course, educator_dashboard, get_educator_courses, get_enrolled_students, health,
    request_educator_role,
};
use crate::state::AppState;

pub fn init_educator_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/add-course", post(add_course))
        .route("/courses", get(get_educator_courses))
        .route("/dashboard", get(educator_dashboard))
        .route("/enrolled-students", get(get_enrolled_students))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_educator,
        ))
        // Any authenticated user may ask for the educator role
        .route(
            "/request-role",
            post(request_educator_role).layer(middleware::from_fn_with_state(
                state,
                require_authenticated,
            )),
        )
        .route("/health", get(health))
}
