use anyhow::Result;

/// Credentials for the external authentication provider.
///
/// `secret_key` authenticates server-side calls to the provider's REST
/// API, `jwt_secret` verifies the session tokens the provider issues to
/// browsers, and `webhook_secret` verifies signed user-lifecycle webhook
/// deliveries.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret_key: String,
    pub jwt_secret: String,
    pub webhook_secret: String,
    pub api_url: String,
}

impl AuthConfig {
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            secret_key: super::required(get, "CLERK_SECRET_KEY")?,
            jwt_secret: super::required(get, "CLERK_JWT_SECRET")?,
            webhook_secret: super::required(get, "CLERK_WEBHOOK_SECRET")?,
            api_url: get("CLERK_API_URL")
                .unwrap_or_else(|| "https://api.clerk.com/v1".to_string()),
        })
    }
}
