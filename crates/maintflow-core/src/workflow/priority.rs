//! Priority derivation for entities created from alerts.

use maintflow_types::alert::GrafanaAlert;
use maintflow_types::maintenance::Priority;
use serde_json::Value;

/// Priority for an entity created from an alert.
///
/// Reads `customData.additionalInfo.priority`, falling back to
/// `customData.priority`. "high" and "low" (any case) map to their levels;
/// anything else, absence included, is `Medium`. Never fails.
pub fn priority_from_alert(alert: &GrafanaAlert) -> Priority {
    let text = alert.custom_data.as_ref().and_then(|data| {
        data.additional_info
            .get("priority")
            .and_then(value_text)
            .or_else(|| data.priority.clone())
    });

    match text.map(|t| t.to_lowercase()).as_deref() {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
