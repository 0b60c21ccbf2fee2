//! Workflow selection: at most one workflow fires per trigger event.

use maintflow_types::error::RepositoryError;
use maintflow_types::workflow::{MainCondition, Workflow};
use uuid::Uuid;

use super::condition::{ConditionSubject, workflow_matches};
use crate::repository::workflow::WorkflowRepository;

/// First enabled workflow, in iteration order, whose conditions all hold.
pub fn first_match<'a, S: ConditionSubject + ?Sized>(
    workflows: &'a [Workflow],
    subject: &S,
) -> Option<&'a Workflow> {
    workflows
        .iter()
        .filter(|w| w.enabled)
        .find(|w| workflow_matches(w, subject))
}

/// Loads a company's workflows for one category and picks the winner.
pub struct WorkflowSelector<W: WorkflowRepository> {
    repo: W,
}

impl<W: WorkflowRepository> WorkflowSelector<W> {
    pub fn new(repo: W) -> Self {
        Self { repo }
    }

    pub async fn select<S: ConditionSubject + Sync + ?Sized>(
        &self,
        company_id: &Uuid,
        category: MainCondition,
        subject: &S,
    ) -> Result<Option<Workflow>, RepositoryError> {
        let candidates = self
            .repo
            .find_by_company_and_category(company_id, category)
            .await?;
        let selected = first_match(&candidates, subject).cloned();

        tracing::debug!(
            %company_id,
            %category,
            candidates = candidates.len(),
            selected = ?selected.as_ref().map(|w| w.id),
            "workflow selection"
        );

        Ok(selected)
    }
}
