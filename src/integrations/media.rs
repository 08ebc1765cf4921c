//! Media host client.
//!
//! Course thumbnails are uploaded to the external media host; we keep only
//! the returned public URL. Upload requests are signed with the account
//! secret using the host's SHA-256 parameter signature scheme.

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::media::MediaConfig;

#[derive(Clone, Debug)]
pub struct MediaStorage {
    client: reqwest::Client,
    config: MediaConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl MediaStorage {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Verify credentials and reachability. Called once during bootstrap;
    /// a failure here aborts startup.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/{}/ping", self.config.api_url, self.config.cloud_name);
        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await
            .context("Media host is unreachable")?;

        if !response.status().is_success() {
            bail!("Media host ping returned {}", response.status());
        }

        Ok(())
    }

    /// Upload an image and return its public URL.
    pub async fn upload_image(&self, content_type: &str, bytes: &[u8]) -> Result<String> {
        let url = format!(
            "{}/{}/image/upload",
            self.config.api_url, self.config.cloud_name
        );

        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign_upload(&timestamp);
        let data_uri = format!("data:{content_type};base64,{}", BASE64.encode(bytes));

        let response = self
            .client
            .post(url)
            .form(&[
                ("file", data_uri.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await
            .context("Media upload request failed")?;

        if !response.status().is_success() {
            bail!("Media upload returned {}", response.status());
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Media host returned an unreadable upload response")?;

        Ok(uploaded.secure_url)
    }

    // Signature over the sorted request parameters plus the account secret.
    fn sign_upload(&self, timestamp: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("timestamp={timestamp}{}", self.config.api_secret));
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> MediaStorage {
        MediaStorage::new(MediaConfig {
            cloud_name: "edura".to_string(),
            api_key: "key".to_string(),
            api_secret: "shhh".to_string(),
            api_url: "https://media.invalid/v1_1".to_string(),
        })
    }

    #[test]
    fn upload_signature_is_deterministic_hex_sha256() {
        let storage = storage();
        let sig = storage.sign_upload("1700000000");

        let mut hasher = Sha256::new();
        hasher.update("timestamp=1700000000shhh");
        assert_eq!(sig, hex::encode(hasher.finalize()));
        assert_eq!(sig.len(), 64);
    }
}
