//! Maintenance domain objects the workflow engine reads and mutates.
//!
//! These are the subjects of workflow conditions (work orders, requests,
//! purchase orders, parts, tasks) and the targets of workflow actions.
//! Their full CRUD lives outside the engine; only the attributes the engine
//! reasons about are modelled here.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Work order / request priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::None => write!(f, "NONE"),
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(Priority::None),
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(format!("invalid priority: '{other}'")),
        }
    }
}

/// Work order / request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    OnHold,
    Complete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => write!(f, "OPEN"),
            Status::InProgress => write!(f, "IN_PROGRESS"),
            Status::OnHold => write!(f, "ON_HOLD"),
            Status::Complete => write!(f, "COMPLETE"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPEN" => Ok(Status::Open),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "ON_HOLD" => Ok(Status::OnHold),
            "COMPLETE" => Ok(Status::Complete),
            other => Err(format!("invalid status: '{other}'")),
        }
    }
}

/// Purchase order approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Operational state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    #[default]
    Operational,
    Down,
    Standby,
    Modernization,
    InspectionScheduled,
    Commissioning,
    EmergencyShutdown,
}

/// A unit of maintenance work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Human-facing sequential number, e.g. "WO000042".
    pub custom_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub asset_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub primary_user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkOrder {
    /// A fresh, open work order with no assignments.
    pub fn new(company_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            company_id,
            custom_id: None,
            title: title.into(),
            description: None,
            priority: Priority::None,
            status: Status::Open,
            asset_id: None,
            location_id: None,
            primary_user_id: None,
            team_id: None,
            category_id: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }
}

/// A maintenance request (a work order that has not been approved yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub asset_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub primary_user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn new(company_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            company_id,
            title: title.into(),
            description: None,
            priority: Priority::None,
            status: Status::Open,
            asset_id: None,
            location_id: None,
            primary_user_id: None,
            team_id: None,
            category_id: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: ApprovalStatus,
    pub vendor_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

/// A checklist task belonging to a work order.
///
/// `asset_id` is the asset of the owning work order, the one a
/// `SET_ASSET_STATUS` action updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub label: String,
    pub value: Option<String>,
    pub number_value: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: AssetStatus,
    pub created_at: DateTime<Utc>,
}
