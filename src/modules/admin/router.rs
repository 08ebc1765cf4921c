use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::middleware::role::require_admin;
use crate::modules::admin::controller::{get_stats, get_users, update_user_role};
use crate::state::AppState;

pub fn init_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/stats", get(get_stats))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
