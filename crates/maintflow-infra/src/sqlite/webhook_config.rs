//! SQLite webhook configuration repository implementation.

use maintflow_core::repository::webhook_config::WebhookConfigRepository;
use maintflow_types::error::RepositoryError;
use maintflow_types::webhook::WebhookConfig;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error, write_error};

#[derive(Clone)]
pub struct SqliteWebhookConfigRepository {
    pool: DatabasePool,
}

impl SqliteWebhookConfigRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<WebhookConfig>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT id, company_id, api_key, enabled, created_at, updated_at FROM webhook_configs WHERE {column} = ?"
        ))
        .bind(value)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let config = WebhookConfigRow::from_row(&row)
                    .map_err(query_error)?
                    .into_config()?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }
}

struct WebhookConfigRow {
    id: String,
    company_id: String,
    api_key: String,
    enabled: bool,
    created_at: String,
    updated_at: String,
}

impl WebhookConfigRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            company_id: row.try_get("company_id")?,
            api_key: row.try_get("api_key")?,
            enabled: row.try_get("enabled")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_config(self) -> Result<WebhookConfig, RepositoryError> {
        Ok(WebhookConfig {
            id: parse_uuid(&self.id)?,
            company_id: parse_uuid(&self.company_id)?,
            api_key: self.api_key,
            enabled: self.enabled,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl WebhookConfigRepository for SqliteWebhookConfigRepository {
    async fn create(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        sqlx::query(
            "INSERT INTO webhook_configs (id, company_id, api_key, enabled, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(config.id.to_string())
        .bind(config.company_id.to_string())
        .bind(&config.api_key)
        .bind(config.enabled)
        .bind(format_datetime(&config.created_at))
        .bind(format_datetime(&config.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            write_error(
                e,
                &format!("company {} already has a webhook config", config.company_id),
            )
        })?;

        Ok(config.clone())
    }

    async fn find_by_company(&self, company_id: &Uuid) -> Result<Option<WebhookConfig>, RepositoryError> {
        self.find_one("company_id", company_id.to_string()).await
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<WebhookConfig>, RepositoryError> {
        self.find_one("api_key", api_key.to_string()).await
    }

    async fn update(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        let result = sqlx::query(
            "UPDATE webhook_configs SET api_key = ?, enabled = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&config.api_key)
        .bind(config.enabled)
        .bind(format_datetime(&config.updated_at))
        .bind(config.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, "api key already in use"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(config.clone())
    }

    async fn delete_by_company(&self, company_id: &Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM webhook_configs WHERE company_id = ?")
            .bind(company_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}
