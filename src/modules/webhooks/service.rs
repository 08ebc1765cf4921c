use anyhow::Context;
use sqlx::PgExecutor;

use crate::utils::errors::AppError;

pub struct WebhookService;

impl WebhookService {
    /// Claim an event id for processing. Returns `false` when the id was
    /// already recorded, in which case the delivery is a replay and must
    /// not mutate anything again.
    pub async fn record_event<'e>(
        db: impl PgExecutor<'e>,
        event_id: &str,
        source: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events (event_id, source)
            VALUES ($1, $2)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(source)
        .execute(db)
        .await
        .context("Failed to record webhook event")
        .map_err(AppError::database)?;

        Ok(result.rows_affected() == 1)
    }
}
