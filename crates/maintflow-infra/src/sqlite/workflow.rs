//! SQLite workflow repository implementation.
//!
//! A workflow spans three tables: `workflow_actions` (one row, referenced by
//! the workflow), `workflow_conditions` (ordered by `position`) and
//! `workflows` itself. Writes touch all three in one transaction.

use std::collections::HashMap;

use maintflow_core::repository::workflow::WorkflowRepository;
use maintflow_types::error::RepositoryError;
use maintflow_types::workflow::{MainCondition, Workflow, WorkflowAction, WorkflowCondition};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{
    enum_text, format_datetime, opt_enum_text, parse_datetime, parse_opt_datetime,
    parse_opt_enum, parse_opt_uuid, parse_uuid, query_error, write_error,
};

const SELECT_WORKFLOW: &str = "SELECT w.id, w.company_id, w.title, w.main_condition, w.enabled, w.created_at, w.updated_at,
        a.work_order_action, a.request_action, a.purchase_order_action, a.part_action, a.task_action,
        a.team_id, a.user_id, a.asset_id, a.location_id, a.category_id, a.vendor_id,
        a.priority, a.asset_status, a.value, a.number_value
     FROM workflows w JOIN workflow_actions a ON a.id = w.action_id";

/// SQLite-backed implementation of `WorkflowRepository`.
#[derive(Clone)]
pub struct SqliteWorkflowRepository {
    pool: DatabasePool,
}

impl SqliteWorkflowRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Attach conditions to workflows loaded without them.
    async fn with_conditions(&self, rows: Vec<SqliteRow>) -> Result<Vec<Workflow>, RepositoryError> {
        let mut workflows = rows
            .iter()
            .map(|row| {
                WorkflowRow::from_row(row)
                    .map_err(query_error)
                    .and_then(WorkflowRow::into_workflow)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if workflows.is_empty() {
            return Ok(workflows);
        }

        let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT * FROM workflow_conditions WHERE workflow_id IN (",
        );
        let mut ids = qb.separated(", ");
        for wf in &workflows {
            ids.push_bind(wf.id.to_string());
        }
        ids.push_unseparated(") ORDER BY workflow_id, position");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut by_workflow: HashMap<Uuid, Vec<WorkflowCondition>> = HashMap::new();
        for row in &rows {
            let row = ConditionRow::from_row(row).map_err(query_error)?;
            let workflow_id = parse_uuid(&row.workflow_id)?;
            by_workflow
                .entry(workflow_id)
                .or_default()
                .push(row.into_condition()?);
        }

        for wf in &mut workflows {
            wf.conditions = by_workflow.remove(&wf.id).unwrap_or_default();
        }
        Ok(workflows)
    }
}

/// Workflow joined with its action.
struct WorkflowRow {
    id: String,
    company_id: String,
    title: String,
    main_condition: String,
    enabled: bool,
    created_at: String,
    updated_at: String,
    work_order_action: Option<String>,
    request_action: Option<String>,
    purchase_order_action: Option<String>,
    part_action: Option<String>,
    task_action: Option<String>,
    team_id: Option<String>,
    user_id: Option<String>,
    asset_id: Option<String>,
    location_id: Option<String>,
    category_id: Option<String>,
    vendor_id: Option<String>,
    priority: Option<String>,
    asset_status: Option<String>,
    value: Option<String>,
    number_value: Option<f64>,
}

impl WorkflowRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            company_id: row.try_get("company_id")?,
            title: row.try_get("title")?,
            main_condition: row.try_get("main_condition")?,
            enabled: row.try_get("enabled")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            work_order_action: row.try_get("work_order_action")?,
            request_action: row.try_get("request_action")?,
            purchase_order_action: row.try_get("purchase_order_action")?,
            part_action: row.try_get("part_action")?,
            task_action: row.try_get("task_action")?,
            team_id: row.try_get("team_id")?,
            user_id: row.try_get("user_id")?,
            asset_id: row.try_get("asset_id")?,
            location_id: row.try_get("location_id")?,
            category_id: row.try_get("category_id")?,
            vendor_id: row.try_get("vendor_id")?,
            priority: row.try_get("priority")?,
            asset_status: row.try_get("asset_status")?,
            value: row.try_get("value")?,
            number_value: row.try_get("number_value")?,
        })
    }

    fn into_workflow(self) -> Result<Workflow, RepositoryError> {
        let main_condition: MainCondition = self
            .main_condition
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        let action = WorkflowAction {
            work_order_action: parse_opt_enum(self.work_order_action.as_deref())?,
            request_action: parse_opt_enum(self.request_action.as_deref())?,
            purchase_order_action: parse_opt_enum(self.purchase_order_action.as_deref())?,
            part_action: parse_opt_enum(self.part_action.as_deref())?,
            task_action: parse_opt_enum(self.task_action.as_deref())?,
            team: parse_opt_uuid(self.team_id.as_deref())?,
            user: parse_opt_uuid(self.user_id.as_deref())?,
            asset: parse_opt_uuid(self.asset_id.as_deref())?,
            location: parse_opt_uuid(self.location_id.as_deref())?,
            category: parse_opt_uuid(self.category_id.as_deref())?,
            vendor: parse_opt_uuid(self.vendor_id.as_deref())?,
            priority: parse_opt_enum(self.priority.as_deref())?,
            asset_status: parse_opt_enum(self.asset_status.as_deref())?,
            value: self.value,
            number_value: self.number_value,
        };

        Ok(Workflow {
            id: parse_uuid(&self.id)?,
            company_id: parse_uuid(&self.company_id)?,
            title: self.title,
            main_condition,
            conditions: Vec::new(),
            action,
            enabled: self.enabled,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ConditionRow {
    workflow_id: String,
    alert_name: Option<String>,
    severity: Option<String>,
    label: Option<String>,
    value: Option<String>,
    number_value: Option<f64>,
    asset_id: Option<String>,
    location_id: Option<String>,
    user_id: Option<String>,
    team_id: Option<String>,
    vendor_id: Option<String>,
    part_id: Option<String>,
    category_id: Option<String>,
    priority: Option<String>,
    work_order_status: Option<String>,
    purchase_order_status: Option<String>,
    created_time_start: Option<String>,
    created_time_end: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl ConditionRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            workflow_id: row.try_get("workflow_id")?,
            alert_name: row.try_get("alert_name")?,
            severity: row.try_get("severity")?,
            label: row.try_get("label")?,
            value: row.try_get("value")?,
            number_value: row.try_get("number_value")?,
            asset_id: row.try_get("asset_id")?,
            location_id: row.try_get("location_id")?,
            user_id: row.try_get("user_id")?,
            team_id: row.try_get("team_id")?,
            vendor_id: row.try_get("vendor_id")?,
            part_id: row.try_get("part_id")?,
            category_id: row.try_get("category_id")?,
            priority: row.try_get("priority")?,
            work_order_status: row.try_get("work_order_status")?,
            purchase_order_status: row.try_get("purchase_order_status")?,
            created_time_start: row.try_get("created_time_start")?,
            created_time_end: row.try_get("created_time_end")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
        })
    }

    fn into_condition(self) -> Result<WorkflowCondition, RepositoryError> {
        Ok(WorkflowCondition {
            alert_name: self.alert_name,
            severity: self.severity,
            label: self.label,
            value: self.value,
            number_value: self.number_value,
            asset: parse_opt_uuid(self.asset_id.as_deref())?,
            location: parse_opt_uuid(self.location_id.as_deref())?,
            user: parse_opt_uuid(self.user_id.as_deref())?,
            team: parse_opt_uuid(self.team_id.as_deref())?,
            vendor: parse_opt_uuid(self.vendor_id.as_deref())?,
            part: parse_opt_uuid(self.part_id.as_deref())?,
            category: parse_opt_uuid(self.category_id.as_deref())?,
            priority: parse_opt_enum(self.priority.as_deref())?,
            work_order_status: parse_opt_enum(self.work_order_status.as_deref())?,
            purchase_order_status: parse_opt_enum(self.purchase_order_status.as_deref())?,
            created_time_start: parse_opt_datetime(self.created_time_start.as_deref())?,
            created_time_end: parse_opt_datetime(self.created_time_end.as_deref())?,
            start_date: parse_opt_datetime(self.start_date.as_deref())?,
            end_date: parse_opt_datetime(self.end_date.as_deref())?,
        })
    }
}

fn opt_text(id: Option<Uuid>) -> Option<String> {
    id.map(|u| u.to_string())
}

impl WorkflowRepository for SqliteWorkflowRepository {
    async fn create(&self, workflow: &Workflow) -> Result<Workflow, RepositoryError> {
        let action = &workflow.action;
        let action_id = Uuid::now_v7().to_string();
        let workflow_id = workflow.id.to_string();

        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(
            "INSERT INTO workflow_actions (id, work_order_action, request_action, purchase_order_action, part_action, task_action, team_id, user_id, asset_id, location_id, category_id, vendor_id, priority, asset_status, value, number_value)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&action_id)
        .bind(opt_enum_text(action.work_order_action.as_ref())?)
        .bind(opt_enum_text(action.request_action.as_ref())?)
        .bind(opt_enum_text(action.purchase_order_action.as_ref())?)
        .bind(opt_enum_text(action.part_action.as_ref())?)
        .bind(opt_enum_text(action.task_action.as_ref())?)
        .bind(opt_text(action.team))
        .bind(opt_text(action.user))
        .bind(opt_text(action.asset))
        .bind(opt_text(action.location))
        .bind(opt_text(action.category))
        .bind(opt_text(action.vendor))
        .bind(opt_enum_text(action.priority.as_ref())?)
        .bind(opt_enum_text(action.asset_status.as_ref())?)
        .bind(&action.value)
        .bind(action.number_value)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        for (position, c) in workflow.conditions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO workflow_conditions (id, workflow_id, position, alert_name, severity, label, value, number_value, asset_id, location_id, user_id, team_id, vendor_id, part_id, category_id, priority, work_order_status, purchase_order_status, created_time_start, created_time_end, start_date, end_date)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::now_v7().to_string())
            .bind(&workflow_id)
            .bind(position as i64)
            .bind(&c.alert_name)
            .bind(&c.severity)
            .bind(&c.label)
            .bind(&c.value)
            .bind(c.number_value)
            .bind(opt_text(c.asset))
            .bind(opt_text(c.location))
            .bind(opt_text(c.user))
            .bind(opt_text(c.team))
            .bind(opt_text(c.vendor))
            .bind(opt_text(c.part))
            .bind(opt_text(c.category))
            .bind(opt_enum_text(c.priority.as_ref())?)
            .bind(opt_enum_text(c.work_order_status.as_ref())?)
            .bind(opt_enum_text(c.purchase_order_status.as_ref())?)
            .bind(c.created_time_start.as_ref().map(format_datetime))
            .bind(c.created_time_end.as_ref().map(format_datetime))
            .bind(c.start_date.as_ref().map(format_datetime))
            .bind(c.end_date.as_ref().map(format_datetime))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        sqlx::query(
            "INSERT INTO workflows (id, company_id, title, main_condition, action_id, enabled, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&workflow_id)
        .bind(workflow.company_id.to_string())
        .bind(&workflow.title)
        .bind(enum_text(&workflow.main_condition)?)
        .bind(&action_id)
        .bind(workflow.enabled)
        .bind(format_datetime(&workflow.created_at))
        .bind(format_datetime(&workflow.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("workflow {workflow_id} already exists")))?;

        tx.commit().await.map_err(query_error)?;

        Ok(workflow.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Workflow>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_WORKFLOW} WHERE w.id = ?"))
            .bind(id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        Ok(self.with_conditions(rows).await?.into_iter().next())
    }

    async fn list_by_company(&self, company_id: &Uuid) -> Result<Vec<Workflow>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_WORKFLOW} WHERE w.company_id = ? ORDER BY w.created_at ASC, w.id ASC"
        ))
        .bind(company_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        self.with_conditions(rows).await
    }

    async fn find_by_company_and_category(
        &self,
        company_id: &Uuid,
        category: MainCondition,
    ) -> Result<Vec<Workflow>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_WORKFLOW} WHERE w.company_id = ? AND w.main_condition = ? ORDER BY w.created_at ASC, w.id ASC"
        ))
        .bind(company_id.to_string())
        .bind(enum_text(&category)?)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        self.with_conditions(rows).await
    }

    async fn set_enabled(&self, ids: &[Uuid], enabled: bool) -> Result<(), RepositoryError> {
        if ids.is_empty() {
            return Ok(());
        }
        let now = format_datetime(&chrono::Utc::now());
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        for id in ids {
            sqlx::query("UPDATE workflows SET enabled = ?, updated_at = ? WHERE id = ?")
                .bind(enabled)
                .bind(&now)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }
        tx.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let action_id: Option<String> =
            sqlx::query_scalar("SELECT action_id FROM workflows WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;
        let Some(action_id) = action_id else {
            return Ok(false);
        };

        // Conditions go with the workflow row (ON DELETE CASCADE).
        sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        sqlx::query("DELETE FROM workflow_actions WHERE id = ?")
            .bind(&action_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use chrono::{Duration, Utc};
    use maintflow_types::maintenance::{AssetStatus, Priority, Status};
    use maintflow_types::workflow::{TaskAction, WorkOrderAction};

    fn workflow(company_id: Uuid, main_condition: MainCondition, offset_secs: i64) -> Workflow {
        let created = Utc::now() + Duration::seconds(offset_secs);
        Workflow {
            id: Uuid::now_v7(),
            company_id,
            title: format!("wf {offset_secs}"),
            main_condition,
            conditions: vec![
                WorkflowCondition {
                    alert_name: Some("HighCPU".to_string()),
                    severity: Some("critical".to_string()),
                    ..Default::default()
                },
                WorkflowCondition {
                    priority: Some(Priority::High),
                    work_order_status: Some(Status::Open),
                    created_time_start: Some(created - Duration::days(1)),
                    ..Default::default()
                },
            ],
            action: WorkflowAction {
                task_action: Some(TaskAction::CreateWorkOrder),
                team: Some(Uuid::now_v7()),
                asset_status: Some(AssetStatus::Down),
                number_value: Some(4.5),
                ..Default::default()
            },
            enabled: true,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrips_action_and_ordered_conditions() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteWorkflowRepository::new(pool);
        let wf = workflow(Uuid::now_v7(), MainCondition::Webhook, 0);

        repo.create(&wf).await.unwrap();
        let loaded = repo.get_by_id(&wf.id).await.unwrap().unwrap();

        assert_eq!(loaded.action, wf.action);
        assert_eq!(loaded.conditions.len(), 2);
        assert_eq!(loaded.conditions[0].alert_name.as_deref(), Some("HighCPU"));
        assert_eq!(loaded.conditions[1].priority, Some(Priority::High));
        assert_eq!(loaded.main_condition, MainCondition::Webhook);
        assert!(repo.get_by_id(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_company_and_category_filters_and_orders() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteWorkflowRepository::new(pool);
        let company = Uuid::now_v7();

        let later = workflow(company, MainCondition::Webhook, 10);
        let earlier = workflow(company, MainCondition::Webhook, 0);
        let other_category = workflow(company, MainCondition::WorkOrder, 5);
        let other_company = workflow(Uuid::now_v7(), MainCondition::Webhook, 1);
        for wf in [&later, &earlier, &other_category, &other_company] {
            repo.create(wf).await.unwrap();
        }

        let found = repo
            .find_by_company_and_category(&company, MainCondition::Webhook)
            .await
            .unwrap();
        let ids: Vec<Uuid> = found.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![earlier.id, later.id]);
        assert!(found.iter().all(|w| w.conditions.len() == 2));

        assert_eq!(repo.list_by_company(&company).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_enabled_batch() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteWorkflowRepository::new(pool);
        let company = Uuid::now_v7();
        let a = workflow(company, MainCondition::Webhook, 0);
        let b = workflow(company, MainCondition::Webhook, 1);
        repo.create(&a).await.unwrap();
        repo.create(&b).await.unwrap();

        repo.set_enabled(&[a.id, b.id], false).await.unwrap();
        let all = repo.list_by_company(&company).await.unwrap();
        assert!(all.iter().all(|w| !w.enabled));

        repo.set_enabled(&[], true).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_removes_action_and_conditions() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteWorkflowRepository::new(pool.clone());
        let mut wf = workflow(Uuid::now_v7(), MainCondition::WorkOrder, 0);
        wf.action.work_order_action = Some(WorkOrderAction::AssignTeam);
        repo.create(&wf).await.unwrap();

        assert!(repo.delete(&wf.id).await.unwrap());
        assert!(!repo.delete(&wf.id).await.unwrap());

        let (conditions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflow_conditions")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        let (actions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflow_actions")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(conditions, 0);
        assert_eq!(actions, 0);
    }
}
