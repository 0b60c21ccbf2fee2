//! Plan gate: restricted plans keep a single active workflow per company.

use maintflow_types::error::RepositoryError;
use maintflow_types::workflow::Workflow;
use serde::Serialize;
use uuid::Uuid;

use crate::repository::workflow::WorkflowRepository;

/// Result of a gate operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanGateReport {
    /// Workflow left enabled by `disable_workflows`, if the company has any.
    pub kept: Option<Uuid>,
    /// Number of workflows whose flag was written.
    pub updated: usize,
}

/// Earliest-created workflow; id breaks ties.
pub fn pick_survivor(workflows: &[Workflow]) -> Option<&Workflow> {
    workflows.iter().min_by_key(|w| (w.created_at, w.id))
}

pub struct PlanGate<W: WorkflowRepository> {
    repo: W,
}

impl<W: WorkflowRepository> PlanGate<W> {
    pub fn new(repo: W) -> Self {
        Self { repo }
    }

    /// Leave exactly one workflow enabled: the earliest created.
    pub async fn disable_workflows(&self, company_id: &Uuid) -> Result<PlanGateReport, RepositoryError> {
        let workflows = self.repo.list_by_company(company_id).await?;
        let Some(survivor) = pick_survivor(&workflows) else {
            return Ok(PlanGateReport {
                kept: None,
                updated: 0,
            });
        };

        let others: Vec<Uuid> = workflows
            .iter()
            .filter(|w| w.id != survivor.id && w.enabled)
            .map(|w| w.id)
            .collect();
        let mut updated = others.len();
        if !others.is_empty() {
            self.repo.set_enabled(&others, false).await?;
        }
        if !survivor.enabled {
            self.repo.set_enabled(&[survivor.id], true).await?;
            updated += 1;
        }

        tracing::info!(%company_id, kept = %survivor.id, updated, "workflows restricted to plan");
        Ok(PlanGateReport {
            kept: Some(survivor.id),
            updated,
        })
    }

    /// Re-enable every workflow of the company.
    pub async fn enable_workflows(&self, company_id: &Uuid) -> Result<PlanGateReport, RepositoryError> {
        let workflows = self.repo.list_by_company(company_id).await?;
        let disabled: Vec<Uuid> = workflows
            .iter()
            .filter(|w| !w.enabled)
            .map(|w| w.id)
            .collect();
        if !disabled.is_empty() {
            self.repo.set_enabled(&disabled, true).await?;
        }

        tracing::info!(%company_id, updated = disabled.len(), "workflows re-enabled");
        Ok(PlanGateReport {
            kept: None,
            updated: disabled.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemWorkflows, workflow};
    use chrono::Duration;
    use maintflow_types::workflow::{MainCondition, WorkflowAction};

    fn aged(company: Uuid, minutes_ago: i64) -> Workflow {
        let mut w = workflow(company, MainCondition::Webhook, vec![], WorkflowAction::default());
        w.created_at -= Duration::minutes(minutes_ago);
        w
    }

    #[tokio::test]
    async fn test_disable_keeps_only_earliest_and_is_idempotent() {
        let company = Uuid::now_v7();
        let newest = aged(company, 1);
        let oldest = aged(company, 30);
        let middle = aged(company, 10);
        let repo = MemWorkflows::with(vec![newest, oldest.clone(), middle]);
        let gate = PlanGate::new(repo.clone());

        let report = gate.disable_workflows(&company).await.unwrap();
        assert_eq!(report.kept, Some(oldest.id));
        assert_eq!(report.updated, 2);
        assert_eq!(repo.enabled_ids(), vec![oldest.id]);

        let again = gate.disable_workflows(&company).await.unwrap();
        assert_eq!(again.kept, Some(oldest.id));
        assert_eq!(again.updated, 0);
        assert_eq!(repo.enabled_ids(), vec![oldest.id]);
    }

    #[tokio::test]
    async fn test_disable_reenables_survivor() {
        let company = Uuid::now_v7();
        let mut oldest = aged(company, 30);
        oldest.enabled = false;
        let newer = aged(company, 1);
        let repo = MemWorkflows::with(vec![oldest.clone(), newer]);

        PlanGate::new(repo.clone())
            .disable_workflows(&company)
            .await
            .unwrap();
        assert_eq!(repo.enabled_ids(), vec![oldest.id]);
    }

    #[tokio::test]
    async fn test_disable_on_empty_company() {
        let gate = PlanGate::new(MemWorkflows::default());
        let report = gate.disable_workflows(&Uuid::now_v7()).await.unwrap();
        assert_eq!(report.kept, None);
    }

    #[tokio::test]
    async fn test_enable_restores_all() {
        let company = Uuid::now_v7();
        let repo = MemWorkflows::with(vec![aged(company, 3), aged(company, 2), aged(company, 1)]);
        let gate = PlanGate::new(repo.clone());
        gate.disable_workflows(&company).await.unwrap();

        let report = gate.enable_workflows(&company).await.unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(repo.enabled_ids().len(), 3);
    }

    #[test]
    fn test_survivor_tie_breaks_on_id() {
        let company = Uuid::now_v7();
        let a = aged(company, 5);
        let mut b = aged(company, 5);
        b.created_at = a.created_at;
        let expected = a.id.min(b.id);
        let list = vec![b, a];
        assert_eq!(pick_survivor(&list).map(|w| w.id), Some(expected));
    }
}
