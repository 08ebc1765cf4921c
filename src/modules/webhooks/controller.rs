use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::modules::users::service::{PurchaseService, UserService};
use crate::modules::webhooks::model::{AuthProviderEvent, PaymentEvent, WebhookAck};
use crate::modules::webhooks::service::WebhookService;
use crate::modules::webhooks::signature::{verify_payment_signature, verify_provider_signature};
use crate::state::AppState;
use crate::utils::errors::AppError;

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::bad_request("Missing webhook signature headers"))
}

fn ack(message: &str) -> Json<WebhookAck> {
    Json(WebhookAck {
        success: true,
        message: message.to_string(),
    })
}

/// Auth provider webhook: mirrors user lifecycle events locally.
///
/// The body must stay raw; the signature covers the exact bytes sent.
#[utoipa::path(
    post,
    path = "/clerk",
    request_body = String,
    responses(
        (status = 200, description = "Event processed", body = WebhookAck),
        (status = 400, description = "Signature or payload rejected", body = WebhookAck)
    ),
    tag = "Webhooks"
)]
#[instrument(skip_all)]
pub async fn clerk_webhooks(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let message_id = header(&headers, "svix-id")?;
    let timestamp = header(&headers, "svix-timestamp")?;
    let signatures = header(&headers, "svix-signature")?;

    verify_provider_signature(
        &state.config.auth.webhook_secret,
        message_id,
        timestamp,
        signatures,
        &body,
    )
    .map_err(|e| AppError::bad_request(e.to_string()))?;

    let event: AuthProviderEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("Invalid webhook payload"))?;

    let mut tx = state.db.begin().await.map_err(AppError::database)?;

    if !WebhookService::record_event(&mut *tx, message_id, "clerk").await? {
        debug!(message_id, "replayed auth event ignored");
        return Ok(ack("Event already processed"));
    }

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            UserService::upsert(
                &mut *tx,
                &event.data.id,
                &event.data.display_name(),
                event.data.primary_email().unwrap_or_default(),
                event.data.image_url.as_deref(),
            )
            .await?;
        }
        "user.deleted" => {
            UserService::delete(&mut *tx, &event.data.id).await?;
        }
        other => {
            debug!(event_type = other, "unhandled auth event");
        }
    }

    tx.commit().await.map_err(AppError::database)?;

    Ok(ack("Webhook processed"))
}

/// Payment processor webhook: settles pending purchases.
#[utoipa::path(
    post,
    path = "/stripe",
    request_body = String,
    responses(
        (status = 200, description = "Event processed", body = WebhookAck),
        (status = 400, description = "Signature or payload rejected", body = WebhookAck)
    ),
    tag = "Webhooks"
)]
#[instrument(skip_all)]
pub async fn stripe_webhooks(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = header(&headers, "stripe-signature")?;

    verify_payment_signature(&state.config.payments.webhook_secret, &body, signature)
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    let event: PaymentEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("Invalid webhook payload"))?;

    let mut tx = state.db.begin().await.map_err(AppError::database)?;

    if !WebhookService::record_event(&mut *tx, &event.id, "stripe").await? {
        debug!(event_id = %event.id, "replayed payment event ignored");
        return Ok(ack("Event already processed"));
    }

    match event.event_type.as_str() {
        "checkout.session.completed" | "payment_intent.succeeded" => {
            let Some(purchase_id) = parse_purchase_id(&event) else {
                return Ok(ack("Event ignored"));
            };
            match PurchaseService::set_status(&mut *tx, purchase_id, "completed").await? {
                Some(purchase) => {
                    PurchaseService::enroll(&mut *tx, purchase.course_id, &purchase.user_id)
                        .await?;
                }
                None => warn!(%purchase_id, "payment event for unknown purchase"),
            }
        }
        "payment_intent.payment_failed" => {
            let Some(purchase_id) = parse_purchase_id(&event) else {
                return Ok(ack("Event ignored"));
            };
            PurchaseService::set_status(&mut *tx, purchase_id, "failed").await?;
        }
        other => {
            debug!(event_type = other, "unhandled payment event");
        }
    }

    tx.commit().await.map_err(AppError::database)?;

    Ok(ack("Webhook processed"))
}

// A delivery without a usable purchase id is acknowledged, not failed:
// the processor would keep retrying a 4xx forever.
fn parse_purchase_id(event: &PaymentEvent) -> Option<Uuid> {
    let raw = event.data.object.purchase_id();
    let parsed = raw.and_then(|s| Uuid::parse_str(s).ok());
    if parsed.is_none() {
        warn!(event_id = %event.id, "payment event without purchase id metadata");
    }
    parsed
}
