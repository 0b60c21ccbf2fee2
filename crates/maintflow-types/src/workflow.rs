//! Workflow domain types for maintflow.
//!
//! A `Workflow` is an event-condition-action rule owned by one company:
//! the `main_condition` picks the trigger category it listens to, the
//! ordered `conditions` must all hold for the triggering subject, and the
//! single `action` says what to do when they do.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::maintenance::{ApprovalStatus, AssetStatus, Priority, Status};

// ---------------------------------------------------------------------------
// Trigger category
// ---------------------------------------------------------------------------

/// The domain-event class a workflow responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainCondition {
    WorkOrder,
    Request,
    PurchaseOrder,
    Part,
    Task,
    Webhook,
}

impl fmt::Display for MainCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainCondition::WorkOrder => write!(f, "WORK_ORDER"),
            MainCondition::Request => write!(f, "REQUEST"),
            MainCondition::PurchaseOrder => write!(f, "PURCHASE_ORDER"),
            MainCondition::Part => write!(f, "PART"),
            MainCondition::Task => write!(f, "TASK"),
            MainCondition::Webhook => write!(f, "WEBHOOK"),
        }
    }
}

impl FromStr for MainCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WORK_ORDER" => Ok(MainCondition::WorkOrder),
            "REQUEST" => Ok(MainCondition::Request),
            "PURCHASE_ORDER" => Ok(MainCondition::PurchaseOrder),
            "PART" => Ok(MainCondition::Part),
            "TASK" => Ok(MainCondition::Task),
            "WEBHOOK" => Ok(MainCondition::Webhook),
            other => Err(format!("invalid main condition: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Action selectors
// ---------------------------------------------------------------------------

/// What to do to a work order that triggered a workflow.
///
/// `AddChecklist` and `SendReminderEmail` are accepted but not yet wired to
/// any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderAction {
    AssignTeam,
    AssignUser,
    AssignAsset,
    AssignCategory,
    AssignLocation,
    AssignPriority,
    AddChecklist,
    SendReminderEmail,
}

/// What to do to a request that triggered a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestAction {
    AssignTeam,
    AssignUser,
    AssignAsset,
    AssignCategory,
    AssignLocation,
    AssignPriority,
    AddChecklist,
    SendReminderEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderAction {
    Approve,
    Reject,
    AssignVendor,
    SendReminderEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartAction {
    CreatePurchaseOrder,
}

/// Task-oriented action. Also drives webhook-triggered workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAction {
    CreateWorkOrder,
    CreateRequest,
    SetAssetStatus,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// One conjunct of a workflow's condition list.
///
/// Every matcher is optional: `None` is a wildcard, `Some(x)` must equal the
/// subject's attribute. Severity compares case-insensitively; everything else
/// is exact. Temporal matchers are inclusive range bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_status: Option<ApprovalStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl WorkflowCondition {
    /// Treat blank text matchers as unset.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(field: &mut Option<String>) {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        blank_to_none(&mut self.alert_name);
        blank_to_none(&mut self.severity);
        blank_to_none(&mut self.label);
        blank_to_none(&mut self.value);
        self
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The side effect attached to a workflow.
///
/// Carries one optional selector per trigger category plus the payload the
/// selected action applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_action: Option<WorkOrderAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_action: Option<RequestAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_action: Option<PurchaseOrderAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_action: Option<PartAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_action: Option<TaskAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_status: Option<AssetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A stored automation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// UUIDv7 assigned at creation; doubles as the creation-order tiebreaker.
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub main_condition: MainCondition,
    /// Conjunction: every entry must match.
    pub conditions: Vec<WorkflowCondition>,
    pub action: WorkflowAction,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    pub title: String,
    pub main_condition: MainCondition,
    #[serde(default)]
    pub conditions: Vec<WorkflowCondition>,
    /// Missing action is stored as an empty action (every selector unset).
    #[serde(default)]
    pub action: Option<WorkflowAction>,
}
