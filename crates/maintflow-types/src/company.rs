use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant. Every workflow, webhook config and maintenance object belongs
/// to exactly one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Role of a user within their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    Admin,
    LimitedAdmin,
    Technician,
    LimitedTechnician,
    ViewOnly,
    Requester,
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleType::Admin => write!(f, "ADMIN"),
            RoleType::LimitedAdmin => write!(f, "LIMITED_ADMIN"),
            RoleType::Technician => write!(f, "TECHNICIAN"),
            RoleType::LimitedTechnician => write!(f, "LIMITED_TECHNICIAN"),
            RoleType::ViewOnly => write!(f, "VIEW_ONLY"),
            RoleType::Requester => write!(f, "REQUESTER"),
        }
    }
}

impl FromStr for RoleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(RoleType::Admin),
            "LIMITED_ADMIN" => Ok(RoleType::LimitedAdmin),
            "TECHNICIAN" => Ok(RoleType::Technician),
            "LIMITED_TECHNICIAN" => Ok(RoleType::LimitedTechnician),
            "VIEW_ONLY" => Ok(RoleType::ViewOnly),
            "REQUESTER" => Ok(RoleType::Requester),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A company member. Only the fields needed to address notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    pub email: String,
    pub role: RoleType,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == RoleType::Admin
    }
}
