//! Company and user lookup port.

use maintflow_types::company::{Company, User};
use maintflow_types::error::RepositoryError;
use uuid::Uuid;

pub trait CompanyRepository: Send + Sync {
    fn create(
        &self,
        company: &Company,
    ) -> impl std::future::Future<Output = Result<Company, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Company>, RepositoryError>> + Send;

    /// Insert a user. Fails with `Conflict` on a duplicate email.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Users holding the administrator role in a company.
    fn find_admins(
        &self,
        company_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;
}
