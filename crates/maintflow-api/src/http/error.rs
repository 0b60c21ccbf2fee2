//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use maintflow_types::error::{CompanyError, WebhookConfigError, WorkflowError};

use crate::http::response::ApiResponse;

/// Application-level error for the administrative endpoints.
#[derive(Debug)]
pub enum AppError {
    Workflow(WorkflowError),
    WebhookConfig(WebhookConfigError),
    Company(CompanyError),
    Internal(String),
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        AppError::Workflow(e)
    }
}

impl From<WebhookConfigError> for AppError {
    fn from(e: WebhookConfigError) -> Self {
        AppError::WebhookConfig(e)
    }
}

impl From<CompanyError> for AppError {
    fn from(e: CompanyError) -> Self {
        AppError::Company(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Workflow(WorkflowError::NotFound) => {
                (StatusCode::NOT_FOUND, "WORKFLOW_NOT_FOUND", "Workflow not found".to_string())
            }
            AppError::Workflow(WorkflowError::Invalid(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::WebhookConfig(WebhookConfigError::NotFound) => (
                StatusCode::NOT_FOUND,
                "WEBHOOK_CONFIG_NOT_FOUND",
                "Webhook config not found".to_string(),
            ),
            AppError::WebhookConfig(e @ WebhookConfigError::AlreadyExists) => {
                (StatusCode::CONFLICT, "CONFLICT", e.to_string())
            }
            AppError::WebhookConfig(WebhookConfigError::CompanyNotFound)
            | AppError::Company(CompanyError::NotFound) => {
                (StatusCode::NOT_FOUND, "COMPANY_NOT_FOUND", "Company not found".to_string())
            }
            AppError::Company(CompanyError::Invalid(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Workflow(e) => (StatusCode::INTERNAL_SERVER_ERROR, "WORKFLOW_ERROR", e.to_string()),
            AppError::WebhookConfig(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "WEBHOOK_CONFIG_ERROR", e.to_string())
            }
            AppError::Company(e) => (StatusCode::INTERNAL_SERVER_ERROR, "COMPANY_ERROR", e.to_string()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }
        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}
