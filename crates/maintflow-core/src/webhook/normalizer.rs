//! Webhook payload normalization.
//!
//! Two payload shapes are accepted:
//!
//! - **native**: the alert sits under `body`, next to `headers` (and
//!   optionally `params`, `query`, `webhookUrl`, `executionMode`, all ignored).
//! - **flat**: the alert fields sit at the top level.
//!
//! Shape detection is purely structural: an object with both `body` and
//! `headers` keys is native, anything else is flat. Both shapes produce the
//! same [`GrafanaAlert`].

use std::collections::BTreeMap;

use maintflow_types::alert::{AlertCustomData, GrafanaAlert};
use maintflow_types::error::WebhookError;
use serde_json::{Map, Value};

/// Which payload layout a request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Native,
    Flat,
}

impl PayloadShape {
    pub fn detect(payload: &Map<String, Value>) -> Self {
        if payload.contains_key("body") && payload.contains_key("headers") {
            PayloadShape::Native
        } else {
            PayloadShape::Flat
        }
    }

    fn error(self, detail: &str) -> WebhookError {
        let prefix = match self {
            PayloadShape::Native => "Invalid Grafana native webhook format",
            PayloadShape::Flat => "Invalid Grafana webhook format",
        };
        WebhookError::Validation(format!("{prefix}: {detail}"))
    }

    fn missing(self, field: &str) -> WebhookError {
        match self {
            PayloadShape::Native => {
                self.error(&format!("{field} is required in Grafana webhook body"))
            }
            PayloadShape::Flat => self.error(&format!("{field} is required")),
        }
    }
}

/// Parse raw request bytes and normalize them.
pub fn normalize_bytes(raw: &[u8]) -> Result<GrafanaAlert, WebhookError> {
    let payload: Value = serde_json::from_slice(raw)
        .map_err(|e| WebhookError::Validation(format!("Invalid webhook payload: {e}")))?;
    normalize(&payload)
}

/// Normalize an already-parsed payload.
pub fn normalize(payload: &Value) -> Result<GrafanaAlert, WebhookError> {
    let Value::Object(top) = payload else {
        return Err(WebhookError::Validation(
            "Invalid webhook payload: expected a JSON object".to_string(),
        ));
    };

    match PayloadShape::detect(top) {
        PayloadShape::Native => {
            let Some(Value::Object(body)) = top.get("body") else {
                return Err(PayloadShape::Native.error("body must be a JSON object"));
            };
            let mut alert = alert_fields(body, PayloadShape::Native)?;
            alert.custom_data = body
                .get("customData")
                .and_then(Value::as_object)
                .map(native_custom_data);
            Ok(alert)
        }
        PayloadShape::Flat => {
            let mut alert = alert_fields(top, PayloadShape::Flat)?;
            alert.custom_data = match top.get("customData") {
                None | Some(Value::Null) => None,
                Some(Value::Object(map)) => Some(flat_custom_data(map)),
                Some(_) => return Err(PayloadShape::Flat.error("customData must be a JSON object")),
            };
            Ok(alert)
        }
    }
}

fn alert_fields(obj: &Map<String, Value>, shape: PayloadShape) -> Result<GrafanaAlert, WebhookError> {
    let required = |field: &str| text(obj, field).ok_or_else(|| shape.missing(field));
    let alert_id = required("alertId")?;
    let alert_name = required("alertName")?;
    let status = required("status")?;
    let severity = required("severity")?;

    let values = obj
        .get("values")
        .and_then(Value::as_object)
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_else(BTreeMap::new);

    Ok(GrafanaAlert {
        alert_id,
        alert_name,
        status,
        severity,
        dashboard_id: text(obj, "dashboardId"),
        panel_id: text(obj, "panelId"),
        rule_url: text(obj, "ruleUrl"),
        evaluation_time: text(obj, "evaluationTime"),
        values,
        message: text(obj, "message"),
        custom_data: None,
    })
}

/// Native custom data: priority defaults to "medium" and the whole map is
/// kept as `additional_info`, duplicated keys included.
fn native_custom_data(map: &Map<String, Value>) -> AlertCustomData {
    AlertCustomData {
        workflow_id: map.get("workflowId").and_then(scalar_text),
        priority: Some(
            map.get("priority")
                .and_then(scalar_text)
                .unwrap_or_else(|| "medium".to_string()),
        ),
        additional_info: map.clone(),
    }
}

/// Flat custom data maps its fields one to one; scalars are rendered as
/// text the same way native custom data is.
fn flat_custom_data(map: &Map<String, Value>) -> AlertCustomData {
    AlertCustomData {
        workflow_id: map.get("workflowId").and_then(scalar_text),
        priority: map.get("priority").and_then(scalar_text),
        additional_info: map
            .get("additionalInfo")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Non-empty text value of a field. Numbers and booleans are rendered as text.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
