//! Webhook configuration endpoints, one config per company.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use maintflow_types::webhook::WebhookConfig;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// POST /api/v1/companies/{company_id}/webhook-config
pub async fn create_config(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WebhookConfig>>, AppError> {
    let timer = RequestTimer::start();
    let config = state.webhook_config_service.create(&company_id).await?;
    Ok(Json(timer.finish(config).with_link("trigger", "/webhooks/grafana")))
}

/// GET /api/v1/companies/{company_id}/webhook-config
pub async fn get_config(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WebhookConfig>>, AppError> {
    let timer = RequestTimer::start();
    let config = state.webhook_config_service.get(&company_id).await?;
    Ok(Json(timer.finish(config)))
}

/// POST /api/v1/companies/{company_id}/webhook-config/regenerate
pub async fn regenerate_key(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WebhookConfig>>, AppError> {
    let timer = RequestTimer::start();
    let config = state.webhook_config_service.regenerate(&company_id).await?;
    Ok(Json(timer.finish(config)))
}

/// POST /api/v1/companies/{company_id}/webhook-config/enabled/{enabled}
pub async fn set_enabled(
    State(state): State<AppState>,
    Path((company_id, enabled)): Path<(Uuid, bool)>,
) -> Result<Json<ApiResponse<WebhookConfig>>, AppError> {
    let timer = RequestTimer::start();
    let config = state
        .webhook_config_service
        .set_enabled(&company_id, enabled)
        .await?;
    Ok(Json(timer.finish(config)))
}

/// DELETE /api/v1/companies/{company_id}/webhook-config
pub async fn delete_config(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    state.webhook_config_service.delete(&company_id).await?;
    Ok(Json(timer.finish(serde_json::json!({ "deleted": true }))))
}
