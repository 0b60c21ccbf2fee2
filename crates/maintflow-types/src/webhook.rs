use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-company webhook credentials.
///
/// One row per company. The API key is opaque and rotatable; lookups during
/// authentication go through the key, never the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub id: Uuid,
    pub company_id: Uuid,
    pub api_key: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WebhookConfig {
    /// New enabled config with a fresh random key.
    pub fn new(company_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            company_id,
            api_key: generate_api_key(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Random v4 UUID rendered as a string.
pub fn generate_api_key() -> String {
    Uuid::new_v4().to_string()
}

/// Body returned by the webhook ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    /// ISO-8601 instant the response was produced.
    pub timestamp: String,
}

impl WebhookResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
