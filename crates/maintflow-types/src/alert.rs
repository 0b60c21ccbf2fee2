//! Canonical alert value built from an inbound webhook call.
//!
//! A `GrafanaAlert` exists for the duration of one request and is never
//! persisted. Both accepted payload shapes normalize into this struct.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized monitoring alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaAlert {
    pub alert_id: String,
    pub alert_name: String,
    /// "firing" or "resolved" (free text).
    pub status: String,
    /// "critical", "warning", "info" (free text).
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_time: Option<String>,
    /// Metric name to observed value.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<AlertCustomData>,
}

/// Caller-supplied extras attached to an alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCustomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default)]
    pub additional_info: Map<String, Value>,
}

impl GrafanaAlert {
    /// Message text, or the empty string when the alert carried none.
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
