use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::AppConfig;
use crate::config::database::init_db_pool;
use crate::integrations::auth_provider::{AuthProvider, ClerkAuthProvider};
use crate::integrations::media::MediaStorage;
use crate::integrations::payments::PaymentClient;

/// Shared application state, built once during bootstrap and cloned into
/// every request. The pool and HTTP clients are the process-wide
/// singletons; nothing here is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: Arc<dyn AuthProvider>,
    pub media: MediaStorage,
    pub payments: PaymentClient,
    pub config: AppConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}

/// Connect every external dependency, in order, before the listener
/// binds. A failure at any step aborts startup.
pub async fn init_app_state(config: AppConfig) -> Result<AppState> {
    let db = init_db_pool(&config.database).await?;
    info!("Database connected");

    let media = MediaStorage::new(config.media.clone());
    media
        .ping()
        .await
        .context("Media host connection failed")?;
    info!("Media host connected");

    let auth: Arc<dyn AuthProvider> = Arc::new(ClerkAuthProvider::new(config.auth.clone()));
    let payments = PaymentClient::new(config.payments.clone());

    Ok(AppState {
        db,
        auth,
        media,
        payments,
        config,
    })
}
