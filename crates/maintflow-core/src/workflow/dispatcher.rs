//! Action dispatch.
//!
//! One `run_*` method per trigger category. Every method re-checks the
//! workflow's conditions against the subject before touching it, then applies
//! the action selected for that category and hands the result to the owning
//! store. Action kinds without an effect yet keep an explicit arm and report
//! [`DispatchOutcome::NoOp`].

use maintflow_types::alert::GrafanaAlert;
use maintflow_types::error::RepositoryError;
use maintflow_types::maintenance::{
    ApprovalStatus, Part, Priority, PurchaseOrder, Request, Status, Task, WorkOrder,
};
use maintflow_types::workflow::{
    PartAction, PurchaseOrderAction, RequestAction, TaskAction, Workflow, WorkflowAction,
    WorkOrderAction,
};
use uuid::Uuid;

use super::condition::{ConditionSubject, workflow_matches};
use super::priority::priority_from_alert;
use crate::repository::maintenance::MaintenanceRepository;

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The subject was mutated (or a new entity created) and persisted.
    Applied,
    /// The selected action has no effect; nothing was written.
    NoOp,
    /// The defensive re-check failed; nothing was written.
    ConditionsNotMet,
}

/// Field an assignment action writes on a work order or request.
#[derive(Debug, Clone, Copy)]
enum Assignment {
    Team,
    User,
    Asset,
    Category,
    Location,
    Priority,
}

fn work_order_assignment(action: WorkOrderAction) -> Option<Assignment> {
    match action {
        WorkOrderAction::AssignTeam => Some(Assignment::Team),
        WorkOrderAction::AssignUser => Some(Assignment::User),
        WorkOrderAction::AssignAsset => Some(Assignment::Asset),
        WorkOrderAction::AssignCategory => Some(Assignment::Category),
        WorkOrderAction::AssignLocation => Some(Assignment::Location),
        WorkOrderAction::AssignPriority => Some(Assignment::Priority),
        WorkOrderAction::AddChecklist => None,
        WorkOrderAction::SendReminderEmail => None,
    }
}

fn request_assignment(action: RequestAction) -> Option<Assignment> {
    match action {
        RequestAction::AssignTeam => Some(Assignment::Team),
        RequestAction::AssignUser => Some(Assignment::User),
        RequestAction::AssignAsset => Some(Assignment::Asset),
        RequestAction::AssignCategory => Some(Assignment::Category),
        RequestAction::AssignLocation => Some(Assignment::Location),
        RequestAction::AssignPriority => Some(Assignment::Priority),
        RequestAction::AddChecklist => None,
        RequestAction::SendReminderEmail => None,
    }
}

/// Mutable view over the assignable fields shared by work orders and requests.
struct AssignableFields<'a> {
    team: &'a mut Option<Uuid>,
    user: &'a mut Option<Uuid>,
    asset: &'a mut Option<Uuid>,
    category: &'a mut Option<Uuid>,
    location: &'a mut Option<Uuid>,
    priority: &'a mut Priority,
}

impl AssignableFields<'_> {
    /// Overwrite the field with the payload value. An empty payload clears
    /// the field; an empty priority resets it to `Priority::None`.
    fn assign(self, field: Assignment, action: &WorkflowAction) {
        match field {
            Assignment::Team => *self.team = action.team,
            Assignment::User => *self.user = action.user,
            Assignment::Asset => *self.asset = action.asset,
            Assignment::Category => *self.category = action.category,
            Assignment::Location => *self.location = action.location,
            Assignment::Priority => *self.priority = action.priority.unwrap_or(Priority::None),
        }
    }
}

/// Applies workflow actions through the maintenance store.
pub struct ActionDispatcher<M: MaintenanceRepository> {
    repo: M,
}

impl<M: MaintenanceRepository> ActionDispatcher<M> {
    pub fn new(repo: M) -> Self {
        Self { repo }
    }

    fn recheck<S: ConditionSubject + ?Sized>(workflow: &Workflow, subject: &S) -> bool {
        let ok = workflow_matches(workflow, subject);
        if !ok {
            tracing::debug!(workflow_id = %workflow.id, "conditions no longer hold, skipping");
        }
        ok
    }

    fn no_effect(workflow: &Workflow, action: &dyn std::fmt::Debug) -> DispatchOutcome {
        tracing::debug!(workflow_id = %workflow.id, ?action, "action has no effect");
        DispatchOutcome::NoOp
    }

    pub async fn run_work_order(
        &self,
        workflow: &Workflow,
        work_order: &mut WorkOrder,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, &*work_order) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        let Some(kind) = workflow.action.work_order_action else {
            return Ok(Self::no_effect(workflow, &"no work order action"));
        };
        let Some(field) = work_order_assignment(kind) else {
            return Ok(Self::no_effect(workflow, &kind));
        };

        let fields = AssignableFields {
            team: &mut work_order.team_id,
            user: &mut work_order.primary_user_id,
            asset: &mut work_order.asset_id,
            category: &mut work_order.category_id,
            location: &mut work_order.location_id,
            priority: &mut work_order.priority,
        };
        fields.assign(field, &workflow.action);

        self.repo.save_work_order(work_order).await?;
        tracing::info!(workflow_id = %workflow.id, work_order_id = %work_order.id, action = ?kind, "work order updated");
        Ok(DispatchOutcome::Applied)
    }

    pub async fn run_request(
        &self,
        workflow: &Workflow,
        request: &mut Request,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, &*request) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        let Some(kind) = workflow.action.request_action else {
            return Ok(Self::no_effect(workflow, &"no request action"));
        };
        let Some(field) = request_assignment(kind) else {
            return Ok(Self::no_effect(workflow, &kind));
        };

        let fields = AssignableFields {
            team: &mut request.team_id,
            user: &mut request.primary_user_id,
            asset: &mut request.asset_id,
            category: &mut request.category_id,
            location: &mut request.location_id,
            priority: &mut request.priority,
        };
        fields.assign(field, &workflow.action);

        self.repo.save_request(request).await?;
        tracing::info!(workflow_id = %workflow.id, request_id = %request.id, action = ?kind, "request updated");
        Ok(DispatchOutcome::Applied)
    }

    pub async fn run_purchase_order(
        &self,
        workflow: &Workflow,
        purchase_order: &mut PurchaseOrder,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, &*purchase_order) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        let Some(kind) = workflow.action.purchase_order_action else {
            return Ok(Self::no_effect(workflow, &"no purchase order action"));
        };

        match kind {
            PurchaseOrderAction::Approve => purchase_order.status = ApprovalStatus::Approved,
            PurchaseOrderAction::Reject => purchase_order.status = ApprovalStatus::Rejected,
            PurchaseOrderAction::AssignVendor => purchase_order.vendor_id = workflow.action.vendor,
            PurchaseOrderAction::SendReminderEmail => return Ok(Self::no_effect(workflow, &kind)),
        }

        self.repo.save_purchase_order(purchase_order).await?;
        tracing::info!(workflow_id = %workflow.id, purchase_order_id = %purchase_order.id, action = ?kind, "purchase order updated");
        Ok(DispatchOutcome::Applied)
    }

    pub async fn run_part(
        &self,
        workflow: &Workflow,
        part: &Part,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, part) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        match workflow.action.part_action {
            Some(PartAction::CreatePurchaseOrder) => {
                Ok(Self::no_effect(workflow, &PartAction::CreatePurchaseOrder))
            }
            None => Ok(Self::no_effect(workflow, &"no part action")),
        }
    }

    pub async fn run_task(
        &self,
        workflow: &Workflow,
        task: &Task,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, task) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        let Some(kind) = workflow.action.task_action else {
            return Ok(Self::no_effect(workflow, &"no task action"));
        };

        match kind {
            TaskAction::CreateWorkOrder | TaskAction::CreateRequest => {
                Ok(Self::no_effect(workflow, &kind))
            }
            TaskAction::SetAssetStatus => {
                let (Some(asset_id), Some(status)) = (task.asset_id, workflow.action.asset_status)
                else {
                    return Ok(Self::no_effect(workflow, &kind));
                };
                let Some(mut asset) = self.repo.find_asset(&asset_id).await? else {
                    tracing::warn!(workflow_id = %workflow.id, %asset_id, "asset not found for task");
                    return Ok(DispatchOutcome::NoOp);
                };
                asset.status = status;
                self.repo.save_asset(&asset).await?;
                tracing::info!(workflow_id = %workflow.id, %asset_id, ?status, "asset status updated");
                Ok(DispatchOutcome::Applied)
            }
        }
    }

    /// Webhook dispatch is driven by the task selector: it creates a new work
    /// order or request from the alert.
    pub async fn run_webhook(
        &self,
        workflow: &Workflow,
        alert: &GrafanaAlert,
    ) -> Result<DispatchOutcome, RepositoryError> {
        if !Self::recheck(workflow, alert) {
            return Ok(DispatchOutcome::ConditionsNotMet);
        }
        let action = &workflow.action;

        // Inspected but never applied to the created entity.
        if let Some(kind) = action.work_order_action {
            match kind {
                WorkOrderAction::AssignTeam
                | WorkOrderAction::AssignUser
                | WorkOrderAction::AssignAsset
                | WorkOrderAction::AssignCategory
                | WorkOrderAction::AssignLocation
                | WorkOrderAction::AssignPriority
                | WorkOrderAction::AddChecklist
                | WorkOrderAction::SendReminderEmail => {
                    tracing::debug!(workflow_id = %workflow.id, action = ?kind, "work order action ignored for webhook trigger");
                }
            }
        }

        let Some(kind) = action.task_action else {
            return Ok(Self::no_effect(workflow, &"no task action"));
        };

        match kind {
            TaskAction::CreateWorkOrder => {
                let mut work_order = WorkOrder::new(
                    workflow.company_id,
                    format!("Auto-created: {}", alert.alert_name),
                );
                work_order.custom_id = Some(
                    self.repo
                        .next_work_order_number(&workflow.company_id)
                        .await?,
                );
                work_order.description =
                    Some(format!("Created from Grafana alert: {}", alert.message_text()));
                work_order.priority = priority_from_alert(alert);
                work_order.status = Status::Open;
                copy_payload(
                    action,
                    &mut work_order.asset_id,
                    &mut work_order.location_id,
                    &mut work_order.team_id,
                    &mut work_order.primary_user_id,
                    &mut work_order.category_id,
                );

                self.repo.save_work_order(&work_order).await?;
                tracing::info!(
                    workflow_id = %workflow.id,
                    work_order_id = %work_order.id,
                    alert_id = %alert.alert_id,
                    "work order created from alert"
                );
                Ok(DispatchOutcome::Applied)
            }
            TaskAction::CreateRequest => {
                let mut request = Request::new(
                    workflow.company_id,
                    format!("Auto-created: {}", alert.alert_name),
                );
                request.description =
                    Some(format!("Created from Grafana alert: {}", alert.message_text()));
                request.priority = priority_from_alert(alert);
                request.status = Status::Open;
                copy_payload(
                    action,
                    &mut request.asset_id,
                    &mut request.location_id,
                    &mut request.team_id,
                    &mut request.primary_user_id,
                    &mut request.category_id,
                );

                self.repo.save_request(&request).await?;
                tracing::info!(
                    workflow_id = %workflow.id,
                    request_id = %request.id,
                    alert_id = %alert.alert_id,
                    "request created from alert"
                );
                Ok(DispatchOutcome::Applied)
            }
            TaskAction::SetAssetStatus => Ok(Self::no_effect(workflow, &kind)),
        }
    }
}

fn copy_payload(
    action: &WorkflowAction,
    asset: &mut Option<Uuid>,
    location: &mut Option<Uuid>,
    team: &mut Option<Uuid>,
    user: &mut Option<Uuid>,
    category: &mut Option<Uuid>,
) {
    if action.asset.is_some() {
        *asset = action.asset;
    }
    if action.location.is_some() {
        *location = action.location;
    }
    if action.team.is_some() {
        *team = action.team;
    }
    if action.user.is_some() {
        *user = action.user;
    }
    if action.category.is_some() {
        *category = action.category;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemMaintenance, workflow};
    use chrono::Utc;
    use maintflow_types::alert::AlertCustomData;
    use maintflow_types::maintenance::{Asset, AssetStatus};
    use maintflow_types::workflow::{MainCondition, WorkflowCondition};

    fn alert(name: &str, message: &str, priority: &str) -> GrafanaAlert {
        GrafanaAlert {
            alert_id: "a1".to_string(),
            alert_name: name.to_string(),
            status: "firing".to_string(),
            severity: "critical".to_string(),
            message: Some(message.to_string()),
            custom_data: Some(AlertCustomData {
                priority: Some(priority.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn webhook_workflow(company: Uuid, task_action: TaskAction) -> Workflow {
        workflow(
            company,
            MainCondition::Webhook,
            vec![WorkflowCondition {
                alert_name: Some("TestAlert".to_string()),
                severity: Some("critical".to_string()),
                ..Default::default()
            }],
            WorkflowAction {
                task_action: Some(task_action),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_webhook_creates_work_order_from_alert() {
        let company = Uuid::now_v7();
        let team = Uuid::now_v7();
        let mut wf = webhook_workflow(company, TaskAction::CreateWorkOrder);
        wf.action.team = Some(team);
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        let outcome = dispatcher
            .run_webhook(&wf, &alert("TestAlert", "m", "high"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);

        let saved = repo.work_orders.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        let wo = &saved[0];
        assert_eq!(wo.title, "Auto-created: TestAlert");
        assert_eq!(wo.description.as_deref(), Some("Created from Grafana alert: m"));
        assert_eq!(wo.status, Status::Open);
        assert_eq!(wo.priority, Priority::High);
        assert_eq!(wo.team_id, Some(team));
        assert_eq!(wo.custom_id.as_deref(), Some("WO000001"));
        assert_eq!(wo.company_id, company);
    }

    #[tokio::test]
    async fn test_webhook_creates_request() {
        let company = Uuid::now_v7();
        let wf = webhook_workflow(company, TaskAction::CreateRequest);
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        dispatcher
            .run_webhook(&wf, &alert("TestAlert", "disk", "low"))
            .await
            .unwrap();

        let requests = repo.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].priority, Priority::Low);
        assert!(repo.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_set_asset_status_is_noop() {
        let wf = webhook_workflow(Uuid::now_v7(), TaskAction::SetAssetStatus);
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        let outcome = dispatcher
            .run_webhook(&wf, &alert("TestAlert", "m", "high"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NoOp);
        assert!(repo.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_recheck_blocks_mismatch() {
        let wf = webhook_workflow(Uuid::now_v7(), TaskAction::CreateWorkOrder);
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        let outcome = dispatcher
            .run_webhook(&wf, &alert("Other", "m", "high"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::ConditionsNotMet);
        assert!(repo.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_ignores_work_order_action() {
        let company = Uuid::now_v7();
        let team = Uuid::now_v7();
        let mut wf = webhook_workflow(company, TaskAction::CreateWorkOrder);
        wf.action.work_order_action = Some(WorkOrderAction::AssignPriority);
        wf.action.priority = Some(Priority::Low);
        wf.action.team = Some(team);
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        dispatcher
            .run_webhook(&wf, &alert("TestAlert", "m", "high"))
            .await
            .unwrap();
        let wo = repo.work_orders.lock().unwrap()[0].clone();
        assert_eq!(wo.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_work_order_assign_team_persists() {
        let company = Uuid::now_v7();
        let team = Uuid::now_v7();
        let wf = workflow(
            company,
            MainCondition::WorkOrder,
            vec![],
            WorkflowAction {
                work_order_action: Some(WorkOrderAction::AssignTeam),
                team: Some(team),
                ..Default::default()
            },
        );
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());
        let mut wo = WorkOrder::new(company, "Leak");

        let outcome = dispatcher.run_work_order(&wf, &mut wo).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(wo.team_id, Some(team));
        assert_eq!(repo.work_orders.lock().unwrap()[0].team_id, Some(team));
    }

    #[tokio::test]
    async fn test_assignment_without_payload_clears_and_saves() {
        let company = Uuid::now_v7();
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        let clear_team = workflow(
            company,
            MainCondition::WorkOrder,
            vec![],
            WorkflowAction {
                work_order_action: Some(WorkOrderAction::AssignTeam),
                ..Default::default()
            },
        );
        let mut wo = WorkOrder::new(company, "Leak");
        wo.team_id = Some(Uuid::now_v7());
        let outcome = dispatcher.run_work_order(&clear_team, &mut wo).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert!(wo.team_id.is_none());
        assert!(repo.work_orders.lock().unwrap()[0].team_id.is_none());

        let clear_priority = workflow(
            company,
            MainCondition::Request,
            vec![],
            WorkflowAction {
                request_action: Some(RequestAction::AssignPriority),
                ..Default::default()
            },
        );
        let mut request = Request::new(company, "Broken light");
        request.priority = Priority::High;
        dispatcher.run_request(&clear_priority, &mut request).await.unwrap();
        assert_eq!(request.priority, Priority::None);
        assert_eq!(repo.requests.lock().unwrap().len(), 1);

        let clear_vendor = workflow(
            company,
            MainCondition::PurchaseOrder,
            vec![],
            WorkflowAction {
                purchase_order_action: Some(PurchaseOrderAction::AssignVendor),
                ..Default::default()
            },
        );
        let mut po = PurchaseOrder {
            id: Uuid::now_v7(),
            company_id: company,
            name: "Belts".to_string(),
            status: ApprovalStatus::Pending,
            vendor_id: Some(Uuid::now_v7()),
            category_id: None,
            created_at: Utc::now(),
        };
        let outcome = dispatcher.run_purchase_order(&clear_vendor, &mut po).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert!(po.vendor_id.is_none());
        assert_eq!(repo.purchase_orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checklist_and_reminder_do_not_save() {
        let company = Uuid::now_v7();
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());

        for kind in [WorkOrderAction::AddChecklist, WorkOrderAction::SendReminderEmail] {
            let wf = workflow(
                company,
                MainCondition::WorkOrder,
                vec![],
                WorkflowAction {
                    work_order_action: Some(kind),
                    ..Default::default()
                },
            );
            let mut wo = WorkOrder::new(company, "Leak");
            let outcome = dispatcher.run_work_order(&wf, &mut wo).await.unwrap();
            assert_eq!(outcome, DispatchOutcome::NoOp);
        }
        assert!(repo.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_assign_priority() {
        let company = Uuid::now_v7();
        let wf = workflow(
            company,
            MainCondition::Request,
            vec![],
            WorkflowAction {
                request_action: Some(RequestAction::AssignPriority),
                priority: Some(Priority::High),
                ..Default::default()
            },
        );
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());
        let mut request = Request::new(company, "Broken light");

        dispatcher.run_request(&wf, &mut request).await.unwrap();
        assert_eq!(request.priority, Priority::High);
        assert_eq!(repo.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_purchase_order_approve_and_vendor() {
        let company = Uuid::now_v7();
        let vendor = Uuid::now_v7();
        let repo = MemMaintenance::default();
        let dispatcher = ActionDispatcher::new(repo.clone());
        let mut po = PurchaseOrder {
            id: Uuid::now_v7(),
            company_id: company,
            name: "Belts".to_string(),
            status: ApprovalStatus::Pending,
            vendor_id: None,
            category_id: None,
            created_at: Utc::now(),
        };

        let approve = workflow(
            company,
            MainCondition::PurchaseOrder,
            vec![],
            WorkflowAction {
                purchase_order_action: Some(PurchaseOrderAction::Approve),
                ..Default::default()
            },
        );
        dispatcher.run_purchase_order(&approve, &mut po).await.unwrap();
        assert_eq!(po.status, ApprovalStatus::Approved);

        let assign = workflow(
            company,
            MainCondition::PurchaseOrder,
            vec![],
            WorkflowAction {
                purchase_order_action: Some(PurchaseOrderAction::AssignVendor),
                vendor: Some(vendor),
                ..Default::default()
            },
        );
        dispatcher.run_purchase_order(&assign, &mut po).await.unwrap();
        assert_eq!(po.vendor_id, Some(vendor));
        assert_eq!(repo.purchase_orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_part_create_purchase_order_is_noop() {
        let company = Uuid::now_v7();
        let wf = workflow(
            company,
            MainCondition::Part,
            vec![],
            WorkflowAction {
                part_action: Some(PartAction::CreatePurchaseOrder),
                ..Default::default()
            },
        );
        let part = Part {
            id: Uuid::now_v7(),
            company_id: company,
            name: "Seal".to_string(),
            category_id: None,
            vendor_id: None,
            quantity: 0.0,
            created_at: Utc::now(),
        };
        let dispatcher = ActionDispatcher::new(MemMaintenance::default());
        assert_eq!(
            dispatcher.run_part(&wf, &part).await.unwrap(),
            DispatchOutcome::NoOp
        );
    }

    #[tokio::test]
    async fn test_task_sets_asset_status() {
        let company = Uuid::now_v7();
        let asset = Asset {
            id: Uuid::now_v7(),
            company_id: company,
            name: "Compressor".to_string(),
            status: AssetStatus::Operational,
            created_at: Utc::now(),
        };
        let repo = MemMaintenance::default();
        repo.assets.lock().unwrap().insert(asset.id, asset.clone());
        let dispatcher = ActionDispatcher::new(repo.clone());

        let wf = workflow(
            company,
            MainCondition::Task,
            vec![WorkflowCondition {
                label: Some("Pressure OK".to_string()),
                value: Some("FAIL".to_string()),
                ..Default::default()
            }],
            WorkflowAction {
                task_action: Some(TaskAction::SetAssetStatus),
                asset_status: Some(AssetStatus::Down),
                ..Default::default()
            },
        );
        let task = Task {
            id: Uuid::now_v7(),
            work_order_id: Uuid::now_v7(),
            asset_id: Some(asset.id),
            label: "Pressure OK".to_string(),
            value: Some("FAIL".to_string()),
            number_value: None,
            created_at: Utc::now(),
        };

        let outcome = dispatcher.run_task(&wf, &task).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(
            repo.assets.lock().unwrap()[&asset.id].status,
            AssetStatus::Down
        );
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let company = Uuid::now_v7();
        let wf = workflow(
            company,
            MainCondition::WorkOrder,
            vec![],
            WorkflowAction {
                work_order_action: Some(WorkOrderAction::AssignTeam),
                team: Some(Uuid::now_v7()),
                ..Default::default()
            },
        );
        let dispatcher = ActionDispatcher::new(MemMaintenance::failing());
        let mut wo = WorkOrder::new(company, "Leak");
        let err = dispatcher.run_work_order(&wf, &mut wo).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
