//! Application state wiring all services together.
//!
//! Services are generic over repository and notifier traits; AppState pins
//! them to the concrete infra implementations. Used by both the CLI and the
//! REST API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use maintflow_core::service::company::CompanyService;
use maintflow_core::service::webhook_config::WebhookConfigService;
use maintflow_core::service::workflow::WorkflowService;
use maintflow_core::webhook::gateway::WebhookGateway;
use maintflow_core::webhook::rate_limiter::RateLimiter;
use maintflow_core::workflow::engine::WorkflowEngine;
use maintflow_infra::config::{ensure_data_dir, load_global_config, resolve_data_dir};
use maintflow_infra::notify::MailNotifier;
use maintflow_infra::sqlite::company::SqliteCompanyRepository;
use maintflow_infra::sqlite::maintenance::SqliteMaintenanceRepository;
use maintflow_infra::sqlite::pool::{DatabasePool, database_url};
use maintflow_infra::sqlite::webhook_config::SqliteWebhookConfigRepository;
use maintflow_infra::sqlite::workflow::SqliteWorkflowRepository;
use maintflow_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteWorkflowService = WorkflowService<SqliteWorkflowRepository>;

pub type ConcreteWebhookConfigService =
    WebhookConfigService<SqliteWebhookConfigRepository, SqliteCompanyRepository>;

pub type ConcreteCompanyService = CompanyService<SqliteCompanyRepository>;

pub type ConcreteGateway = WebhookGateway<
    SqliteWorkflowRepository,
    SqliteMaintenanceRepository,
    SqliteWebhookConfigRepository,
    SqliteCompanyRepository,
    MailNotifier,
>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<ConcreteWorkflowService>,
    pub webhook_config_service: Arc<ConcreteWebhookConfigService>,
    pub company_service: Arc<ConcreteCompanyService>,
    pub gateway: Arc<ConcreteGateway>,
    /// Read access to work orders and requests created by workflows.
    pub maintenance: SqliteMaintenanceRepository,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Resolve the data directory, load `config.toml`, open the database and
    /// wire services. Mail goes through SMTP when `SMTP_HOST` is set.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let db_pool = DatabasePool::new(&format!("{}?mode=rwc", database_url(&data_dir))).await?;

        Ok(Self::with_pool(db_pool, config, data_dir, MailNotifier::from_env()))
    }

    /// Wire services over an already-open pool.
    pub fn with_pool(
        db_pool: DatabasePool,
        config: GlobalConfig,
        data_dir: PathBuf,
        notifier: MailNotifier,
    ) -> Self {
        let workflows = SqliteWorkflowRepository::new(db_pool.clone());
        let maintenance = SqliteMaintenanceRepository::new(db_pool.clone());
        let webhook_configs = SqliteWebhookConfigRepository::new(db_pool.clone());
        let companies = SqliteCompanyRepository::new(db_pool.clone());

        let gateway = WebhookGateway::new(
            WorkflowEngine::new(workflows.clone(), maintenance.clone()),
            webhook_configs.clone(),
            companies.clone(),
            notifier,
            RateLimiter::from_config(&config.rate_limit),
            Duration::from_secs(config.engine.dispatch_timeout_secs),
        );

        Self {
            workflow_service: Arc::new(WorkflowService::new(workflows)),
            webhook_config_service: Arc::new(WebhookConfigService::new(
                webhook_configs,
                companies.clone(),
            )),
            company_service: Arc::new(CompanyService::new(companies)),
            gateway: Arc::new(gateway),
            maintenance,
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
