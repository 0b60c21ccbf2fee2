//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use maintflow_types::company::{Company, User};
use maintflow_types::error::{NotifyError, RepositoryError};
use maintflow_types::maintenance::{Asset, PurchaseOrder, Request, WorkOrder};
use maintflow_types::webhook::WebhookConfig;
use maintflow_types::workflow::{MainCondition, Workflow, WorkflowAction, WorkflowCondition};
use uuid::Uuid;

use crate::notify::Notifier;
use crate::repository::company::CompanyRepository;
use crate::repository::maintenance::MaintenanceRepository;
use crate::repository::webhook_config::WebhookConfigRepository;
use crate::repository::workflow::WorkflowRepository;

pub fn workflow(
    company_id: Uuid,
    main_condition: MainCondition,
    conditions: Vec<WorkflowCondition>,
    action: WorkflowAction,
) -> Workflow {
    let now = Utc::now();
    Workflow {
        id: Uuid::now_v7(),
        company_id,
        title: "test workflow".to_string(),
        main_condition,
        conditions,
        action,
        enabled: true,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Clone, Default)]
pub struct MemWorkflows {
    pub rows: Arc<Mutex<Vec<Workflow>>>,
}

impl MemWorkflows {
    pub fn with(workflows: Vec<Workflow>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(workflows)),
        }
    }

    pub fn enabled_ids(&self) -> Vec<Uuid> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.enabled)
            .map(|w| w.id)
            .collect()
    }
}

impl WorkflowRepository for MemWorkflows {
    async fn create(&self, workflow: &Workflow) -> Result<Workflow, RepositoryError> {
        self.rows.lock().unwrap().push(workflow.clone());
        Ok(workflow.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Workflow>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|w| &w.id == id).cloned())
    }

    async fn list_by_company(&self, company_id: &Uuid) -> Result<Vec<Workflow>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| &w.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn find_by_company_and_category(
        &self,
        company_id: &Uuid,
        category: MainCondition,
    ) -> Result<Vec<Workflow>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| &w.company_id == company_id && w.main_condition == category)
            .cloned()
            .collect())
    }

    async fn set_enabled(&self, ids: &[Uuid], enabled: bool) -> Result<(), RepositoryError> {
        for w in self.rows.lock().unwrap().iter_mut() {
            if ids.contains(&w.id) {
                w.enabled = enabled;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|w| &w.id != id);
        Ok(rows.len() != before)
    }
}

/// Maintenance store that can be told to fail every write.
#[derive(Clone, Default)]
pub struct MemMaintenance {
    pub work_orders: Arc<Mutex<Vec<WorkOrder>>>,
    pub requests: Arc<Mutex<Vec<Request>>>,
    pub purchase_orders: Arc<Mutex<Vec<PurchaseOrder>>>,
    pub assets: Arc<Mutex<HashMap<Uuid, Asset>>>,
    pub fail_writes: bool,
}

impl MemMaintenance {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.fail_writes {
            Err(RepositoryError::Query("disk I/O error".to_string()))
        } else {
            Ok(())
        }
    }
}

fn upsert<T: Clone>(rows: &Mutex<Vec<T>>, item: &T, same: impl Fn(&T) -> bool) {
    let mut rows = rows.lock().unwrap();
    match rows.iter_mut().find(|r| same(r)) {
        Some(existing) => *existing = item.clone(),
        None => rows.push(item.clone()),
    }
}

impl MaintenanceRepository for MemMaintenance {
    async fn save_work_order(&self, work_order: &WorkOrder) -> Result<(), RepositoryError> {
        self.check()?;
        upsert(&self.work_orders, work_order, |w| w.id == work_order.id);
        Ok(())
    }

    async fn save_request(&self, request: &Request) -> Result<(), RepositoryError> {
        self.check()?;
        upsert(&self.requests, request, |r| r.id == request.id);
        Ok(())
    }

    async fn save_purchase_order(&self, purchase_order: &PurchaseOrder) -> Result<(), RepositoryError> {
        self.check()?;
        upsert(&self.purchase_orders, purchase_order, |p| {
            p.id == purchase_order.id
        });
        Ok(())
    }

    async fn save_asset(&self, asset: &Asset) -> Result<(), RepositoryError> {
        self.check()?;
        self.assets.lock().unwrap().insert(asset.id, asset.clone());
        Ok(())
    }

    async fn find_asset(&self, id: &Uuid) -> Result<Option<Asset>, RepositoryError> {
        Ok(self.assets.lock().unwrap().get(id).cloned())
    }

    async fn get_work_order(&self, id: &Uuid) -> Result<Option<WorkOrder>, RepositoryError> {
        Ok(self
            .work_orders
            .lock()
            .unwrap()
            .iter()
            .find(|w| &w.id == id)
            .cloned())
    }

    async fn list_work_orders(&self, company_id: &Uuid) -> Result<Vec<WorkOrder>, RepositoryError> {
        Ok(self
            .work_orders
            .lock()
            .unwrap()
            .iter()
            .filter(|w| &w.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_requests(&self, company_id: &Uuid) -> Result<Vec<Request>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn next_work_order_number(&self, company_id: &Uuid) -> Result<String, RepositoryError> {
        let count = self
            .work_orders
            .lock()
            .unwrap()
            .iter()
            .filter(|w| &w.company_id == company_id)
            .count();
        Ok(format!("WO{:06}", count + 1))
    }
}

#[derive(Clone, Default)]
pub struct MemWebhookConfigs {
    pub rows: Arc<Mutex<Vec<WebhookConfig>>>,
}

impl MemWebhookConfigs {
    pub fn with(config: WebhookConfig) -> Self {
        Self {
            rows: Arc::new(Mutex::new(vec![config])),
        }
    }
}

impl WebhookConfigRepository for MemWebhookConfigs {
    async fn create(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.company_id == config.company_id) {
            return Err(RepositoryError::Conflict("company already has a config".to_string()));
        }
        rows.push(config.clone());
        Ok(config.clone())
    }

    async fn find_by_company(&self, company_id: &Uuid) -> Result<Option<WebhookConfig>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.company_id == company_id)
            .cloned())
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<WebhookConfig>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.api_key == api_key)
            .cloned())
    }

    async fn update(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let existing = rows
            .iter_mut()
            .find(|c| c.id == config.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = config.clone();
        Ok(config.clone())
    }

    async fn delete_by_company(&self, company_id: &Uuid) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| &c.company_id != company_id);
        Ok(rows.len() != before)
    }
}

#[derive(Clone, Default)]
pub struct MemCompanies {
    pub companies: Arc<Mutex<Vec<Company>>>,
    pub users: Arc<Mutex<Vec<User>>>,
}

impl CompanyRepository for MemCompanies {
    async fn create(&self, company: &Company) -> Result<Company, RepositoryError> {
        self.companies.lock().unwrap().push(company.clone());
        Ok(company.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Company>, RepositoryError> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(user.clone())
    }

    async fn find_admins(&self, company_id: &Uuid) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| &u.company_id == company_id && u.is_admin())
            .cloned()
            .collect())
    }
}

/// Records every email; optionally fails each send, or never completes it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, String, String)>>>,
    pub fail: bool,
    pub stall: bool,
}

impl Notifier for RecordingNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        if self.fail {
            Err(NotifyError::Delivery("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}
