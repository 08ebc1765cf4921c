//! Webhook endpoints must reject unverifiable deliveries with 400 before
//! touching anything else. The test state carries a lazy, unconnected
//! pool: if a rejected delivery reached persistence the request would
//! surface a 500 instead, so the 400 assertions double as proof that no
//! mutation was attempted.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use common::{CLERK_WEBHOOK_KEY, STRIPE_WEBHOOK_SECRET, StubAuthProvider, body_json, test_state};
use edura::router::init_router;

type HmacSha256 = Hmac<Sha256>;

fn stripe_request(body: &[u8], signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/stripe")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

fn sign_stripe(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn clerk_request(
    body: &[u8],
    id_ts_sig: Option<(&str, &str, String)>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/clerk")
        .header("content-type", "application/json");
    if let Some((id, timestamp, signature)) = id_ts_sig {
        builder = builder
            .header("svix-id", id)
            .header("svix-timestamp", timestamp)
            .header("svix-signature", signature);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

fn sign_clerk(key: &[u8], id: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).unwrap();
    mac.update(format!("{id}.{timestamp}.").as_bytes());
    mac.update(body);
    format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
}

#[tokio::test]
async fn stripe_webhook_without_signature_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));

    let response = app
        .oneshot(stripe_request(br#"{"id":"evt_1"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn stripe_webhook_with_wrong_secret_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));
    let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#;
    let signature = sign_stripe("not-the-configured-secret", "1700000000", payload);

    let response = app
        .oneshot(stripe_request(payload, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stripe_webhook_with_tampered_body_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));
    let signed = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#;
    let signature = sign_stripe(STRIPE_WEBHOOK_SECRET, "1700000000", signed);
    let tampered = br#"{"id":"evt_2","type":"checkout.session.completed","data":{"object":{}}}"#;

    let response = app
        .oneshot(stripe_request(tampered, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stripe_webhook_with_valid_signature_but_unparseable_payload_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));
    let payload = b"not json at all";
    let signature = sign_stripe(STRIPE_WEBHOOK_SECRET, "1700000000", payload);

    let response = app
        .oneshot(stripe_request(payload, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid webhook payload");
}

#[tokio::test]
async fn clerk_webhook_without_signature_headers_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));

    let response = app
        .oneshot(clerk_request(br#"{"type":"user.created"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Missing webhook signature headers");
}

#[tokio::test]
async fn clerk_webhook_with_wrong_key_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));
    let payload = br#"{"type":"user.created","data":{"id":"user_1"}}"#;
    let signature = sign_clerk(b"some-other-key", "msg_1", "1700000000", payload);

    let response = app
        .oneshot(clerk_request(
            payload,
            Some(("msg_1", "1700000000", signature)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clerk_webhook_with_mismatched_message_id_is_400() {
    let app = init_router(test_state(StubAuthProvider::new()));
    let payload = br#"{"type":"user.created","data":{"id":"user_1"}}"#;
    let signature = sign_clerk(CLERK_WEBHOOK_KEY, "msg_1", "1700000000", payload);

    // Signed for msg_1 but delivered claiming msg_2
    let response = app
        .oneshot(clerk_request(
            payload,
            Some(("msg_2", "1700000000", signature)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
