//! Webhook configuration repository trait definition.

use maintflow_types::error::RepositoryError;
use maintflow_types::webhook::WebhookConfig;
use uuid::Uuid;

/// Storage for per-company webhook credentials.
pub trait WebhookConfigRepository: Send + Sync {
    /// Insert a config. Fails with `Conflict` if the company already has one.
    fn create(
        &self,
        config: &WebhookConfig,
    ) -> impl std::future::Future<Output = Result<WebhookConfig, RepositoryError>> + Send;

    fn find_by_company(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<WebhookConfig>, RepositoryError>> + Send;

    /// Authentication lookup.
    fn find_by_api_key(
        &self,
        api_key: &str,
    ) -> impl std::future::Future<Output = Result<Option<WebhookConfig>, RepositoryError>> + Send;

    /// Overwrite key, enabled flag and `updated_at`.
    fn update(
        &self,
        config: &WebhookConfig,
    ) -> impl std::future::Future<Output = Result<WebhookConfig, RepositoryError>> + Send;

    /// Returns `true` if a config existed.
    fn delete_by_company(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
