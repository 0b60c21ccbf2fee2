//! Read-only views of the work orders and requests workflows produce.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use maintflow_core::repository::maintenance::MaintenanceRepository;
use maintflow_types::maintenance::{Request, WorkOrder};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// GET /api/v1/companies/{company_id}/work-orders
pub async fn list_work_orders(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<WorkOrder>>>, AppError> {
    let timer = RequestTimer::start();
    let work_orders = state
        .maintenance
        .list_work_orders(&company_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(timer.finish(work_orders)))
}

/// GET /api/v1/companies/{company_id}/requests
pub async fn list_requests(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Request>>>, AppError> {
    let timer = RequestTimer::start();
    let requests = state
        .maintenance
        .list_requests(&company_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(timer.finish(requests)))
}
