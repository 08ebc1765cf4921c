use axum::extract::State;
use axum::http::{HeaderValue, Method, Uri};
use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::admin::router::init_admin_router;
use crate::modules::courses::router::init_course_router;
use crate::modules::educator::router::init_educator_router;
use crate::modules::users::router::init_user_router;
use crate::modules::webhooks::controller::{clerk_webhooks, stripe_webhooks};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(api_root))
        // Webhook endpoints read the raw body themselves; they live at the
        // root, outside the JSON-speaking /api tree
        .route("/clerk", post(clerk_webhooks))
        .route("/stripe", post(stripe_webhooks))
        .nest(
            "/api",
            Router::new()
                .nest("/user", init_user_router(state.clone()))
                .nest("/educator", init_educator_router(state.clone()))
                .nest("/course", init_course_router())
                .nest("/admin", init_admin_router(state.clone())),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .config
                .cors
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

async fn api_root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "API Working",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment.as_str(),
    }))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}
