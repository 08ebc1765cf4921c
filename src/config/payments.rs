use anyhow::Result;

/// Payment processor credentials. `secret_key` authenticates checkout
/// session creation, `webhook_secret` verifies signed payment event
/// deliveries.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub api_url: String,
    pub currency: String,
}

impl PaymentConfig {
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            secret_key: super::required(get, "STRIPE_SECRET_KEY")?,
            webhook_secret: super::required(get, "STRIPE_WEBHOOK_SECRET")?,
            api_url: get("STRIPE_API_URL").unwrap_or_else(|| "https://api.stripe.com/v1".to_string()),
            currency: get("PAYMENT_CURRENCY").unwrap_or_else(|| "usd".to_string()),
        })
    }
}
