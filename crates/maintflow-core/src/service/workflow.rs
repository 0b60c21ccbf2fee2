//! Workflow administration.

use chrono::Utc;
use maintflow_types::error::{RepositoryError, WorkflowError};
use maintflow_types::workflow::{CreateWorkflowRequest, Workflow, WorkflowCondition};
use uuid::Uuid;

use crate::repository::workflow::WorkflowRepository;
use crate::workflow::plan_gate::{PlanGate, PlanGateReport};

fn storage(e: RepositoryError) -> WorkflowError {
    WorkflowError::StorageError(e.to_string())
}

/// Create, inspect and toggle a company's workflows, plus the plan gate.
pub struct WorkflowService<W: WorkflowRepository> {
    repo: W,
    gate: PlanGate<W>,
}

impl<W: WorkflowRepository + Clone> WorkflowService<W> {
    pub fn new(repo: W) -> Self {
        Self {
            gate: PlanGate::new(repo.clone()),
            repo,
        }
    }
}

impl<W: WorkflowRepository> WorkflowService<W> {
    /// Validate and persist a new, enabled workflow.
    pub async fn create(
        &self,
        company_id: &Uuid,
        request: CreateWorkflowRequest,
    ) -> Result<Workflow, WorkflowError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(WorkflowError::Invalid("title cannot be empty".to_string()));
        }

        let conditions: Vec<WorkflowCondition> = request
            .conditions
            .into_iter()
            .map(WorkflowCondition::normalized)
            .collect();
        for (i, c) in conditions.iter().enumerate() {
            validate_ranges(c).map_err(|msg| WorkflowError::Invalid(format!("condition {i}: {msg}")))?;
        }

        let now = Utc::now();
        let workflow = Workflow {
            id: Uuid::now_v7(),
            company_id: *company_id,
            title,
            main_condition: request.main_condition,
            conditions,
            action: request.action.unwrap_or_default(),
            enabled: true,
            created_at: now,
            updated_at: now,
        };

        let workflow = self.repo.create(&workflow).await.map_err(storage)?;
        tracing::info!(
            %company_id,
            workflow_id = %workflow.id,
            main_condition = %workflow.main_condition,
            "workflow created"
        );
        Ok(workflow)
    }

    pub async fn list(&self, company_id: &Uuid) -> Result<Vec<Workflow>, WorkflowError> {
        self.repo.list_by_company(company_id).await.map_err(storage)
    }

    /// A workflow of another company is reported as not found.
    pub async fn get(&self, company_id: &Uuid, id: &Uuid) -> Result<Workflow, WorkflowError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .filter(|w| &w.company_id == company_id)
            .ok_or(WorkflowError::NotFound)
    }

    pub async fn delete(&self, company_id: &Uuid, id: &Uuid) -> Result<(), WorkflowError> {
        self.get(company_id, id).await?;
        if !self.repo.delete(id).await.map_err(storage)? {
            return Err(WorkflowError::NotFound);
        }
        tracing::info!(%company_id, workflow_id = %id, "workflow deleted");
        Ok(())
    }

    pub async fn set_enabled(
        &self,
        company_id: &Uuid,
        id: &Uuid,
        enabled: bool,
    ) -> Result<Workflow, WorkflowError> {
        let mut workflow = self.get(company_id, id).await?;
        self.repo
            .set_enabled(&[workflow.id], enabled)
            .await
            .map_err(storage)?;
        workflow.enabled = enabled;
        Ok(workflow)
    }

    /// Restricted plan: keep only the earliest workflow enabled.
    pub async fn disable_workflows(&self, company_id: &Uuid) -> Result<PlanGateReport, WorkflowError> {
        self.gate.disable_workflows(company_id).await.map_err(storage)
    }

    /// Unrestricted plan: enable every workflow.
    pub async fn enable_workflows(&self, company_id: &Uuid) -> Result<PlanGateReport, WorkflowError> {
        self.gate.enable_workflows(company_id).await.map_err(storage)
    }
}

fn validate_ranges(c: &WorkflowCondition) -> Result<(), String> {
    if let (Some(start), Some(end)) = (c.created_time_start, c.created_time_end) {
        if start > end {
            return Err("createdTimeStart is after createdTimeEnd".to_string());
        }
    }
    if let (Some(start), Some(end)) = (c.start_date, c.end_date) {
        if start > end {
            return Err("startDate is after endDate".to_string());
        }
    }
    Ok(())
}
