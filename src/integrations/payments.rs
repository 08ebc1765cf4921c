//! Payment processor client.
//!
//! Course purchases go through the processor's hosted checkout: we create
//! a session carrying the purchase id as metadata and redirect the buyer
//! to it. The webhook receiver picks the purchase back up when the
//! processor reports the payment outcome.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::payments::PaymentConfig;

#[derive(Clone, Debug)]
pub struct PaymentClient {
    client: reqwest::Client,
    config: PaymentConfig,
}

/// A created hosted-checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

impl PaymentClient {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a checkout session for one course purchase.
    ///
    /// `amount` is in major currency units; the processor wants the
    /// smallest unit.
    pub async fn create_checkout_session(
        &self,
        purchase_id: Uuid,
        course_title: &str,
        amount: f64,
        origin: &str,
    ) -> Result<CheckoutSession> {
        let unit_amount = ((amount * 100.0).round() as i64).to_string();
        let purchase_id = purchase_id.to_string();
        let success_url = format!("{origin}/loading/my-enrollments");
        let cancel_url = format!("{origin}/");

        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &success_url),
            ("cancel_url", &cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &self.config.currency),
            (
                "line_items[0][price_data][product_data][name]",
                course_title,
            ),
            ("line_items[0][price_data][unit_amount]", &unit_amount),
            ("metadata[purchase_id]", &purchase_id),
            ("payment_intent_data[metadata][purchase_id]", &purchase_id),
        ];

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.config.api_url))
            .basic_auth(&self.config.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .context("Payment processor request failed")?;

        if !response.status().is_success() {
            bail!("Payment processor returned {}", response.status());
        }

        response
            .json::<CheckoutSession>()
            .await
            .context("Payment processor returned an unreadable session")
    }
}
