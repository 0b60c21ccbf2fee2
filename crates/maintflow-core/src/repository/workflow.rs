//! Workflow repository trait definition.

use maintflow_types::error::RepositoryError;
use maintflow_types::workflow::{MainCondition, Workflow};
use uuid::Uuid;

/// Repository trait for workflow persistence.
///
/// A workflow is stored together with its action and conditions; readers
/// always get the fully assembled value.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait WorkflowRepository: Send + Sync {
    /// Persist a new workflow. Action and conditions are written before the
    /// workflow row, all in one unit of work.
    fn create(
        &self,
        workflow: &Workflow,
    ) -> impl std::future::Future<Output = Result<Workflow, RepositoryError>> + Send;

    /// Get a workflow by its UUID.
    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Workflow>, RepositoryError>> + Send;

    /// All workflows of a company, oldest first.
    fn list_by_company(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Workflow>, RepositoryError>> + Send;

    /// All workflows of a company listening to `category`, enabled or not.
    fn find_by_company_and_category(
        &self,
        company_id: &Uuid,
        category: MainCondition,
    ) -> impl std::future::Future<Output = Result<Vec<Workflow>, RepositoryError>> + Send;

    /// Set the enabled flag on every listed workflow in one batch.
    fn set_enabled(
        &self,
        ids: &[Uuid],
        enabled: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a workflow and everything it owns. Returns `true` if it existed.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
