//! Entry points for internally triggered workflows.
//!
//! CRUD services call `on_*` after changing a maintenance object. The engine
//! selects the first matching enabled workflow of the matching category and
//! dispatches it. Storage errors propagate to the caller unchanged.

use maintflow_types::alert::GrafanaAlert;
use maintflow_types::error::RepositoryError;
use maintflow_types::maintenance::{Part, PurchaseOrder, Request, Task, WorkOrder};
use maintflow_types::workflow::{MainCondition, Workflow};
use uuid::Uuid;

use super::dispatcher::{ActionDispatcher, DispatchOutcome};
use super::selector::WorkflowSelector;
use crate::repository::maintenance::MaintenanceRepository;
use crate::repository::workflow::WorkflowRepository;

/// A workflow that fired and what its action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub workflow_id: Uuid,
    pub outcome: DispatchOutcome,
}

pub struct WorkflowEngine<W: WorkflowRepository, M: MaintenanceRepository> {
    selector: WorkflowSelector<W>,
    dispatcher: ActionDispatcher<M>,
}

impl<W: WorkflowRepository, M: MaintenanceRepository> WorkflowEngine<W, M> {
    pub fn new(workflows: W, maintenance: M) -> Self {
        Self {
            selector: WorkflowSelector::new(workflows),
            dispatcher: ActionDispatcher::new(maintenance),
        }
    }

    pub async fn on_work_order(
        &self,
        work_order: &mut WorkOrder,
    ) -> Result<Option<Fired>, RepositoryError> {
        let company_id = work_order.company_id;
        let Some(workflow) = self
            .selector
            .select(&company_id, MainCondition::WorkOrder, &*work_order)
            .await?
        else {
            return Ok(None);
        };
        let outcome = self.dispatcher.run_work_order(&workflow, work_order).await?;
        Ok(Some(fired(&workflow, outcome)))
    }

    pub async fn on_request(&self, request: &mut Request) -> Result<Option<Fired>, RepositoryError> {
        let company_id = request.company_id;
        let Some(workflow) = self
            .selector
            .select(&company_id, MainCondition::Request, &*request)
            .await?
        else {
            return Ok(None);
        };
        let outcome = self.dispatcher.run_request(&workflow, request).await?;
        Ok(Some(fired(&workflow, outcome)))
    }

    pub async fn on_purchase_order(
        &self,
        purchase_order: &mut PurchaseOrder,
    ) -> Result<Option<Fired>, RepositoryError> {
        let company_id = purchase_order.company_id;
        let Some(workflow) = self
            .selector
            .select(&company_id, MainCondition::PurchaseOrder, &*purchase_order)
            .await?
        else {
            return Ok(None);
        };
        let outcome = self
            .dispatcher
            .run_purchase_order(&workflow, purchase_order)
            .await?;
        Ok(Some(fired(&workflow, outcome)))
    }

    pub async fn on_part(&self, part: &Part) -> Result<Option<Fired>, RepositoryError> {
        let Some(workflow) = self
            .selector
            .select(&part.company_id, MainCondition::Part, part)
            .await?
        else {
            return Ok(None);
        };
        let outcome = self.dispatcher.run_part(&workflow, part).await?;
        Ok(Some(fired(&workflow, outcome)))
    }

    /// Tasks carry no company; the caller passes the owning work order's.
    pub async fn on_task(
        &self,
        company_id: &Uuid,
        task: &Task,
    ) -> Result<Option<Fired>, RepositoryError> {
        let Some(workflow) = self
            .selector
            .select(company_id, MainCondition::Task, task)
            .await?
        else {
            return Ok(None);
        };
        let outcome = self.dispatcher.run_task(&workflow, task).await?;
        Ok(Some(fired(&workflow, outcome)))
    }

    /// Selection step of the webhook path.
    pub async fn select_webhook(
        &self,
        company_id: &Uuid,
        alert: &GrafanaAlert,
    ) -> Result<Option<Workflow>, RepositoryError> {
        self.selector
            .select(company_id, MainCondition::Webhook, alert)
            .await
    }

    /// Dispatch step of the webhook path.
    pub async fn dispatch_webhook(
        &self,
        workflow: &Workflow,
        alert: &GrafanaAlert,
    ) -> Result<DispatchOutcome, RepositoryError> {
        self.dispatcher.run_webhook(workflow, alert).await
    }
}

fn fired(workflow: &Workflow, outcome: DispatchOutcome) -> Fired {
    Fired {
        workflow_id: workflow.id,
        outcome,
    }
}
