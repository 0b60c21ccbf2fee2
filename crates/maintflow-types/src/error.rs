use thiserror::Error;

/// Errors from repository operations (used by trait definitions in maintflow-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Failures surfaced by the webhook gateway.
///
/// Everything except `Execution` and `Storage` is detected before any domain
/// mutation is attempted.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Webhook is disabled for this company")]
    Disabled,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to execute workflow: {0}")]
    Execution(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for WebhookError {
    fn from(e: RepositoryError) -> Self {
        WebhookError::Storage(e.to_string())
    }
}

/// Errors related to workflow administration.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow not found")]
    NotFound,

    #[error("invalid workflow: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to webhook configuration management.
#[derive(Debug, Error)]
pub enum WebhookConfigError {
    #[error("webhook config not found")]
    NotFound,

    #[error("Webhook config already exists for this company")]
    AlreadyExists,

    #[error("company not found")]
    CompanyNotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to company administration.
#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("invalid company: {0}")]
    Invalid(String),

    #[error("company not found")]
    NotFound,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}
