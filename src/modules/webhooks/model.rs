use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User-lifecycle event from the auth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthProviderEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: AuthProviderUserData,
}

/// The `data` object of an auth provider event. Deletion events only
/// carry the id, so everything else is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthProviderUserData {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

impl AuthProviderUserData {
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
    }
}

/// Payment event from the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    pub object: PaymentObject,
}

/// The object attached to a payment event. Only the metadata matters to
/// us; our checkout sessions carry the purchase id there.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentObject {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentObject {
    pub fn purchase_id(&self) -> Option<&str> {
        self.metadata.get("purchase_id").map(String::as_str)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_provider_event_parses_a_full_user() {
        let event: AuthProviderEvent = serde_json::from_value(json!({
            "type": "user.created",
            "data": {
                "id": "user_1",
                "first_name": "Grace",
                "last_name": "Hopper",
                "image_url": "https://img.example/grace.png",
                "email_addresses": [{ "email_address": "grace@example.com" }]
            }
        }))
        .unwrap();

        assert_eq!(event.event_type, "user.created");
        assert_eq!(event.data.display_name(), "Grace Hopper");
        assert_eq!(event.data.primary_email(), Some("grace@example.com"));
    }

    #[test]
    fn auth_provider_event_parses_a_deletion() {
        let event: AuthProviderEvent = serde_json::from_value(json!({
            "type": "user.deleted",
            "data": { "id": "user_1", "deleted": true }
        }))
        .unwrap();

        assert_eq!(event.data.id, "user_1");
        assert_eq!(event.data.display_name(), "");
        assert_eq!(event.data.primary_email(), None);
    }

    #[test]
    fn payment_event_exposes_the_purchase_id() {
        let event: PaymentEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": { "purchase_id": "b2a7..." } } }
        }))
        .unwrap();

        assert_eq!(event.data.object.purchase_id(), Some("b2a7..."));
    }

    #[test]
    fn payment_event_tolerates_missing_metadata() {
        let event: PaymentEvent = serde_json::from_value(json!({
            "id": "evt_2",
            "type": "payment_intent.payment_failed",
            "data": { "object": { "amount": 100 } }
        }))
        .unwrap();

        assert_eq!(event.data.object.purchase_id(), None);
    }
}
