//! Webhook configuration management.

use chrono::Utc;
use maintflow_types::error::{RepositoryError, WebhookConfigError};
use maintflow_types::webhook::{WebhookConfig, generate_api_key};
use uuid::Uuid;

use crate::repository::company::CompanyRepository;
use crate::repository::webhook_config::WebhookConfigRepository;

fn storage(e: RepositoryError) -> WebhookConfigError {
    WebhookConfigError::StorageError(e.to_string())
}

pub struct WebhookConfigService<C: WebhookConfigRepository, K: CompanyRepository> {
    configs: C,
    companies: K,
}

impl<C: WebhookConfigRepository, K: CompanyRepository> WebhookConfigService<C, K> {
    pub fn new(configs: C, companies: K) -> Self {
        Self { configs, companies }
    }

    /// Issue a config with a fresh key. One per company.
    pub async fn create(&self, company_id: &Uuid) -> Result<WebhookConfig, WebhookConfigError> {
        if self.companies.find_by_id(company_id).await.map_err(storage)?.is_none() {
            return Err(WebhookConfigError::CompanyNotFound);
        }
        if self.configs.find_by_company(company_id).await.map_err(storage)?.is_some() {
            return Err(WebhookConfigError::AlreadyExists);
        }

        let config = self
            .configs
            .create(&WebhookConfig::new(*company_id))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => WebhookConfigError::AlreadyExists,
                other => storage(other),
            })?;
        tracing::info!(%company_id, "webhook config created");
        Ok(config)
    }

    pub async fn get(&self, company_id: &Uuid) -> Result<WebhookConfig, WebhookConfigError> {
        self.configs
            .find_by_company(company_id)
            .await
            .map_err(storage)?
            .ok_or(WebhookConfigError::NotFound)
    }

    /// Replace the API key. The old key stops working immediately.
    pub async fn regenerate(&self, company_id: &Uuid) -> Result<WebhookConfig, WebhookConfigError> {
        let mut config = self.get(company_id).await?;
        config.api_key = generate_api_key();
        config.updated_at = Utc::now();
        let config = self.configs.update(&config).await.map_err(storage)?;
        tracing::info!(%company_id, "webhook api key regenerated");
        Ok(config)
    }

    pub async fn set_enabled(
        &self,
        company_id: &Uuid,
        enabled: bool,
    ) -> Result<WebhookConfig, WebhookConfigError> {
        let mut config = self.get(company_id).await?;
        config.enabled = enabled;
        config.updated_at = Utc::now();
        let config = self.configs.update(&config).await.map_err(storage)?;
        tracing::info!(%company_id, enabled, "webhook toggled");
        Ok(config)
    }

    pub async fn delete(&self, company_id: &Uuid) -> Result<(), WebhookConfigError> {
        if !self.configs.delete_by_company(company_id).await.map_err(storage)? {
            return Err(WebhookConfigError::NotFound);
        }
        tracing::info!(%company_id, "webhook config deleted");
        Ok(())
    }

    /// Config owning `api_key`, enabled or not.
    pub async fn resolve(&self, api_key: &str) -> Result<Option<WebhookConfig>, WebhookConfigError> {
        self.configs.find_by_api_key(api_key).await.map_err(storage)
    }
}
