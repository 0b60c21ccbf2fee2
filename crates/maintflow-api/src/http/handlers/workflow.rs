//! Workflow administration endpoints, scoped to a company.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use maintflow_core::workflow::plan_gate::PlanGateReport;
use maintflow_types::workflow::{CreateWorkflowRequest, Workflow};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// POST /api/v1/companies/{company_id}/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(body): Json<CreateWorkflowRequest>,
) -> Result<Json<ApiResponse<Workflow>>, AppError> {
    let timer = RequestTimer::start();
    let workflow = state.workflow_service.create(&company_id, body).await?;
    let link = format!("/api/v1/companies/{company_id}/workflows/{}", workflow.id);
    Ok(Json(timer.finish(workflow).with_link("self", &link)))
}

/// GET /api/v1/companies/{company_id}/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Workflow>>>, AppError> {
    let timer = RequestTimer::start();
    let workflows = state.workflow_service.list(&company_id).await?;
    Ok(Json(timer.finish(workflows)))
}

/// GET /api/v1/companies/{company_id}/workflows/{id}
pub async fn get_workflow(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Workflow>>, AppError> {
    let timer = RequestTimer::start();
    let workflow = state.workflow_service.get(&company_id, &id).await?;
    Ok(Json(timer.finish(workflow)))
}

/// DELETE /api/v1/companies/{company_id}/workflows/{id}
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    state.workflow_service.delete(&company_id, &id).await?;
    Ok(Json(timer.finish(serde_json::json!({ "deleted": true, "id": id }))))
}

/// POST /api/v1/companies/{company_id}/workflows/{id}/enabled/{enabled}
pub async fn set_enabled(
    State(state): State<AppState>,
    Path((company_id, id, enabled)): Path<(Uuid, Uuid, bool)>,
) -> Result<Json<ApiResponse<Workflow>>, AppError> {
    let timer = RequestTimer::start();
    let workflow = state
        .workflow_service
        .set_enabled(&company_id, &id, enabled)
        .await?;
    Ok(Json(timer.finish(workflow)))
}

/// POST /api/v1/companies/{company_id}/workflows/disable
///
/// Restricted plan: keeps the earliest workflow enabled, disables the rest.
pub async fn disable_workflows(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlanGateReport>>, AppError> {
    let timer = RequestTimer::start();
    let report = state.workflow_service.disable_workflows(&company_id).await?;
    Ok(Json(timer.finish(report)))
}

/// POST /api/v1/companies/{company_id}/workflows/enable
pub async fn enable_workflows(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlanGateReport>>, AppError> {
    let timer = RequestTimer::start();
    let report = state.workflow_service.enable_workflows(&company_id).await?;
    Ok(Json(timer.finish(report)))
}
