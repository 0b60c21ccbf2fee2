//! Grafana webhook trigger.
//!
//! The body is taken as raw bytes so that authentication and rate limiting
//! run before any parsing, and so a malformed body still gets the webhook
//! response shape instead of an extractor rejection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use maintflow_types::error::WebhookError;
use maintflow_types::webhook::WebhookResponse;

use crate::state::AppState;

/// Header carrying the per-company API key.
pub const API_KEY_HEADER: &str = "x-api-key";

fn status_for(error: &WebhookError) -> StatusCode {
    match error {
        WebhookError::MissingApiKey | WebhookError::InvalidApiKey => StatusCode::UNAUTHORIZED,
        WebhookError::Disabled => StatusCode::FORBIDDEN,
        WebhookError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        WebhookError::Validation(_) => StatusCode::BAD_REQUEST,
        WebhookError::Execution(_) | WebhookError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /webhooks/grafana
pub async fn receive_grafana(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    match state.gateway.handle(api_key, &body).await {
        Ok(outcome) => (StatusCode::OK, Json(WebhookResponse::success(outcome.message()))),
        Err(WebhookError::Storage(detail)) => {
            tracing::error!(%detail, "webhook failed on storage access");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse::failure("Failed to process webhook")),
            )
        }
        Err(e) => (status_for(&e), Json(WebhookResponse::failure(e.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_map_to_http_statuses() {
        assert_eq!(status_for(&WebhookError::MissingApiKey), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&WebhookError::InvalidApiKey), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&WebhookError::Disabled), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&WebhookError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_for(&WebhookError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&WebhookError::Execution("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
