//! Authentication provider adapter.
//!
//! Identities live in the external auth provider; this module only reads
//! and updates them over its REST API. The trait is object-safe so the
//! application state can hold an `Arc<dyn AuthProvider>` and tests can
//! swap in a canned implementation.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::json;

use crate::config::auth::AuthConfig;
use crate::modules::users::model::Role;

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A user record as the auth provider stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    /// Raw role claim from the provider's public metadata. Absent for
    /// ordinary users; interpreted by [`Role::from_claim`].
    pub role: Option<String>,
}

/// Server-side view of the auth provider.
///
/// A missing user is `Ok(None)`, not an error: the role gate turns it
/// into a 404, while any `Err` becomes a generic 500 without crashing
/// the request chain.
pub trait AuthProvider: Send + Sync {
    fn fetch_user<'a>(&'a self, user_id: &'a str) -> ProviderFuture<'a, Option<ProviderUser>>;

    fn update_role<'a>(&'a self, user_id: &'a str, role: Role) -> ProviderFuture<'a, ()>;
}

/// HTTP implementation over the provider's REST API.
#[derive(Clone, Debug)]
pub struct ClerkAuthProvider {
    client: reqwest::Client,
    config: AuthConfig,
}

impl ClerkAuthProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/users/{user_id}", self.config.api_url)
    }
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ApiEmail>,
    #[serde(default)]
    public_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiEmail {
    email_address: String,
}

impl From<ApiUser> for ProviderUser {
    fn from(user: ApiUser) -> Self {
        let name = [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        ProviderUser {
            id: user.id,
            name,
            email: user.email_addresses.into_iter().next().map(|e| e.email_address),
            image_url: user.image_url,
            role: user
                .public_metadata
                .get("role")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        }
    }
}

impl AuthProvider for ClerkAuthProvider {
    fn fetch_user<'a>(&'a self, user_id: &'a str) -> ProviderFuture<'a, Option<ProviderUser>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.user_url(user_id))
                .bearer_auth(&self.config.secret_key)
                .send()
                .await
                .context("Auth provider request failed")?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !response.status().is_success() {
                bail!("Auth provider returned {}", response.status());
            }

            let user: ApiUser = response
                .json()
                .await
                .context("Auth provider returned an unreadable user record")?;

            Ok(Some(user.into()))
        })
    }

    fn update_role<'a>(&'a self, user_id: &'a str, role: Role) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let response = self
                .client
                .patch(format!("{}/metadata", self.user_url(user_id)))
                .bearer_auth(&self.config.secret_key)
                .json(&json!({ "public_metadata": { "role": role.as_str() } }))
                .send()
                .await
                .context("Auth provider request failed")?;

            if !response.status().is_success() {
                bail!("Auth provider returned {}", response.status());
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_user_conversion_joins_names_and_picks_primary_email() {
        let api_user: ApiUser = serde_json::from_value(json!({
            "id": "user_1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "image_url": "https://img.example/ada.png",
            "email_addresses": [
                { "email_address": "ada@example.com" },
                { "email_address": "backup@example.com" }
            ],
            "public_metadata": { "role": "educator" }
        }))
        .unwrap();

        let user = ProviderUser::from(api_user);
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.role.as_deref(), Some("educator"));
    }

    #[test]
    fn api_user_conversion_tolerates_sparse_records() {
        let api_user: ApiUser = serde_json::from_value(json!({
            "id": "user_2",
            "first_name": null,
            "last_name": null,
            "image_url": null
        }))
        .unwrap();

        let user = ProviderUser::from(api_user);
        assert_eq!(user.name, "");
        assert_eq!(user.email, None);
        assert_eq!(user.role, None);
    }
}
