//! Role gate behavior, driven through real Axum routers with a stub auth
//! provider. The gated route is a plain handler that records whether it
//! ran, so rejection tests can also assert the chain actually stopped.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{MethodRouter, get};
use axum::{Json, Router, middleware};
use tower::ServiceExt;

use common::{StubAuthProvider, body_json, mint_token, test_state};
use edura::middleware::auth::CurrentIdentity;
use edura::middleware::role::{require_admin, require_authenticated, require_educator};
use edura::state::AppState;

/// A handler that reports the identity the gate attached and flips a flag
/// so tests can assert whether the chain reached it.
fn probe_route() -> (MethodRouter<AppState>, Arc<AtomicBool>) {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();

    let route = get(move |CurrentIdentity(identity): CurrentIdentity| {
        let flag = flag.clone();
        async move {
            flag.store(true, Ordering::SeqCst);
            Json(serde_json::json!({
                "id": identity.id,
                "role": identity.role.as_str(),
            }))
        }
    });

    (route, called)
}

macro_rules! gated_app {
    ($state:expr, $gate:path) => {{
        let (route, called) = probe_route();
        let app = Router::new()
            .route("/protected", route)
            .route_layer(middleware::from_fn_with_state($state.clone(), $gate))
            .with_state($state.clone());
        (app, called)
    }};
}

fn get_protected(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/protected");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_token_is_401_and_handler_never_runs() {
    let state = test_state(StubAuthProvider::new().with_user("user_1", Some("educator")));
    let (app, called) = gated_app!(state, require_educator);

    let response = app.oneshot(get_protected(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn garbage_token_is_401() {
    let state = test_state(StubAuthProvider::new().with_user("user_1", Some("educator")));
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some("not-a-real-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn unknown_user_is_404() {
    let state = test_state(StubAuthProvider::new());
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("user_ghost"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User not found in authentication system");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn provider_failure_is_500_not_a_crash() {
    let state = test_state(StubAuthProvider::failing());
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("user_1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Authentication service error");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn wrong_role_is_403_exactly() {
    let state = test_state(StubAuthProvider::new().with_user("user_1", None));
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("user_1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn role_match_is_exact_admin_does_not_pass_educator_gate() {
    let state = test_state(StubAuthProvider::new().with_user("admin_1", Some("admin")));
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("admin_1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn unrecognized_role_claim_is_403() {
    let state = test_state(StubAuthProvider::new().with_user("user_1", Some("superuser")));
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("user_1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Unrecognized account role");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn matching_role_runs_handler_with_identity_attached() {
    let state = test_state(StubAuthProvider::new().with_user("edu_1", Some("educator")));
    let (app, called) = gated_app!(state, require_educator);

    let response = app
        .oneshot(get_protected(Some(&mint_token("edu_1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "edu_1");
    assert_eq!(body["role"], "educator");
    assert!(called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn admin_gate_admits_admins_only() {
    let state = test_state(
        StubAuthProvider::new()
            .with_user("admin_1", Some("admin"))
            .with_user("edu_1", Some("educator")),
    );

    let (app, _) = gated_app!(state, require_admin);
    let response = app
        .oneshot(get_protected(Some(&mint_token("admin_1"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (app, called) = gated_app!(state, require_admin);
    let response = app
        .oneshot(get_protected(Some(&mint_token("edu_1"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn authenticated_gate_admits_any_known_role() {
    let state = test_state(
        StubAuthProvider::new()
            .with_user("user_1", None)
            .with_user("edu_1", Some("educator"))
            .with_user("admin_1", Some("admin")),
    );

    for (id, role) in [
        ("user_1", "user"),
        ("edu_1", "educator"),
        ("admin_1", "admin"),
    ] {
        let (app, called) = gated_app!(state, require_authenticated);
        let response = app
            .oneshot(get_protected(Some(&mint_token(id))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "role {role}");
        let body = body_json(response).await;
        assert_eq!(body["role"], role);
        assert!(called.load(Ordering::SeqCst));
    }
}
