//! Company bootstrap endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use maintflow_types::company::{Company, User};
use maintflow_types::error::CompanyError;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub admin_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddAdminRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCompany {
    #[serde(flatten)]
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<User>,
}

/// POST /api/v1/companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(body): Json<CreateCompanyRequest>,
) -> Result<Json<ApiResponse<CreatedCompany>>, AppError> {
    let timer = RequestTimer::start();
    let (company, admin) = state
        .company_service
        .create(&body.name, body.admin_email.as_deref())
        .await?;
    let link = format!("/api/v1/companies/{}", company.id);
    Ok(Json(timer.finish(CreatedCompany { company, admin }).with_link("self", &link)))
}

/// GET /api/v1/companies/{company_id}
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let timer = RequestTimer::start();
    let company = state
        .company_service
        .get(&company_id)
        .await?
        .ok_or(CompanyError::NotFound)?;
    Ok(Json(timer.finish(company)))
}

/// POST /api/v1/companies/{company_id}/admins
pub async fn add_admin(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(body): Json<AddAdminRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let timer = RequestTimer::start();
    let user = state.company_service.add_admin(&company_id, &body.email).await?;
    Ok(Json(timer.finish(user)))
}
